//! # configobj
//!
//! A tolerant parser for the configobj dialect of INI files: nested sections
//! opened with repeated brackets, quoted keys and values, and triple-quoted
//! multi-line values.
//!
//! ## Overview
//!
//! Input is read line by line into a tree of named sections holding string
//! key/value pairs. Parsing never fails on malformed content: lines that match
//! no known shape are skipped and the rest of the document is still loaded.
//! The only error a parse reports is a failure of the underlying reader.
//!
//! ```text
//! name = demo                 # implicit root section
//!
//! [server]                    # depth 1
//!     host = "localhost"
//!     [[tls]]                 # depth 2, child of server
//!         cert = '/etc/cert.pem'
//!
//! [motd]
//!     text = """
//! Welcome.
//! Have a nice day.
//! """
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use configobj::ConfigObj;
//!
//! let document = ConfigObj::parse_str(
//!     "name = demo\n[server]\nhost = \"localhost\"\n[[tls]]\ncert = '/etc/cert.pem'",
//! );
//!
//! assert_eq!(document.value("name"), "demo");
//! let server = document.section("server").unwrap();
//! assert_eq!(server.value("host"), "localhost");
//! assert_eq!(server.section("tls").unwrap().value("cert"), "/etc/cert.pem");
//!
//! // Missing keys read as empty strings
//! assert_eq!(server.value("port"), "");
//! assert_eq!(server.try_value("port"), None);
//! ```
//!
//! ## Serde Integration
//!
//! Every value is a string. Typed fields are parsed on demand:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     debug: bool,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Config {
//!     server: Server,
//! }
//!
//! let config: Config = configobj::from_str("[server]\nhost = h\nport = 8080\ndebug = on")?;
//! assert_eq!(config.server.port, 8080);
//! assert!(config.server.debug);
//! # Ok::<(), configobj::ConfigObjError>(())
//! ```
//!
//! ## Diagnostics
//!
//! ```rust
//! use configobj::{ConfigObj, DiagnosticKind, ParserConfig};
//!
//! let config = ParserConfig::new().with_collect_diagnostics(true);
//! let document = ConfigObj::parse_str_with_config("[[unbalanced]\nkey = value", config);
//!
//! assert_eq!(document.value("key"), "value");
//! assert_eq!(
//!     document.diagnostics()[0].kind,
//!     DiagnosticKind::UnbalancedBrackets { open: 2, close: 1 }
//! );
//! ```
//!
//! ## Logging
//!
//! Line classification is traced through the `log` facade at `trace` level;
//! skipped and repaired lines are logged at `debug` level.

pub mod deserializer;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod section;
mod writer;

// Re-export main types and functions
pub use deserializer::{SectionDeserializer, from_reader, from_section, from_str};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use document::ConfigObj;
pub use error::{ConfigObjError, Result, SerdeError, WriteError};
pub use parser::ParserConfig;
pub use section::{EntryMap, ROOT_NAME, Section, SectionId, SectionMap, SectionMut, SectionPath};
