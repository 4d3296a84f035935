//! Error types for configobj parsing, rendering and deserialization
//!
//! Parsing itself is tolerant: malformed lines are skipped, never reported
//! as errors. The only failure a parse can surface is an I/O failure of the
//! underlying reader. Rendering and serde conversion have their own variants.

use std::fmt;
use thiserror::Error;

/// Main error type for configobj operations
#[derive(Debug, Error)]
pub enum ConfigObjError {
    /// I/O error while reading the input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde deserialization error
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeError),

    /// The tree holds content that the text format cannot express
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// Serde integration errors
#[derive(Debug, Error)]
pub enum SerdeError {
    /// Custom serde error message
    #[error("{0}")]
    Custom(String),

    /// A string value could not be interpreted as the requested type
    #[error("Type mismatch: expected {expected}, found {found:?} at '{path}'")]
    TypeMismatch {
        expected: String,
        found: String,
        path: String,
    },

    /// A struct field expected a section but the name is absent
    #[error("Missing section '{name}' at '{path}'")]
    MissingSection { name: String, path: String },

    /// A key and a child section share a name, so they cannot both be fields
    #[error("Key and section both named '{name}' at '{path}'")]
    NameCollision { name: String, path: String },
}

/// Errors raised when rendering a tree back to text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    /// Key is empty, spans lines, has edge characters that get trimmed on
    /// read, or needs quoting but contains both quote characters
    #[error("Key {key:?} in section '{path}' cannot be written")]
    UnrepresentableKey { key: String, path: String },

    /// Multi-line value containing both triple-quote delimiters, or a carriage return
    #[error("Value of key {key:?} in section '{path}' cannot be written")]
    UnrepresentableValue { key: String, path: String },

    /// Section name is blank, spans lines or contains both quote characters
    #[error("Section name {name:?} under '{path}' cannot be written")]
    UnrepresentableSection { name: String, path: String },
}

pub type Result<T, E = ConfigObjError> = std::result::Result<T, E>;

impl serde::de::Error for ConfigObjError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ConfigObjError::Serde(SerdeError::Custom(msg.to_string()))
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}
