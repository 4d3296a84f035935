//! Rendering a section tree back to configobj text
//!
//! Output is canonical: entries of a section come before its child sections,
//! bracket count equals the tree level, and keys, values and names are quoted
//! only when the bare form would read back differently. Multi-line values
//! use `"""`, or `'''` when the value itself contains `"""`.

use crate::error::{Result, WriteError};
use crate::lexer::{TripleQuote, trim_key};
use crate::section::Section;

const INDENT: &str = "    ";

/// Renders `root` and everything below it.
pub(crate) fn render(root: Section<'_>) -> Result<String> {
    let mut out = String::new();
    write_section(root, 0, &mut out)?;
    Ok(out)
}

fn write_section(section: Section<'_>, level: usize, out: &mut String) -> Result<()> {
    let indent = INDENT.repeat(level.saturating_sub(1));

    for (key, value) in section.all_values() {
        out.push_str(&indent);
        out.push_str(&format_key(key, section)?);
        out.push_str(" = ");
        out.push_str(&format_value(key, value, section)?);
        out.push('\n');
    }

    for (name, child) in section.sections() {
        if !out.is_empty() {
            out.push('\n');
        }
        let child_level = level + 1;
        out.push_str(&INDENT.repeat(level));
        out.push_str(&"[".repeat(child_level));
        out.push_str(&format_section_name(name, section)?);
        out.push_str(&"]".repeat(child_level));
        out.push('\n');
        write_section(child, child_level, out)?;
    }

    Ok(())
}

fn format_key(key: &str, section: Section<'_>) -> Result<String> {
    let unrepresentable = || WriteError::UnrepresentableKey {
        key: key.to_string(),
        path: section.dotted_path(),
    };

    if key.is_empty() || key.contains(['\n', '\r']) || trim_key(key) != key {
        return Err(unrepresentable().into());
    }

    let needs_quotes = key.starts_with(['#', ';', '['])
        || key.contains('=')
        || has_outer_whitespace(key);
    if !needs_quotes {
        return Ok(key.to_string());
    }
    quote_with_free_char(key).ok_or_else(|| unrepresentable().into())
}

fn format_value(key: &str, value: &str, section: Section<'_>) -> Result<String> {
    if value.contains('\n') {
        return format_multiline(key, value, section);
    }

    let needs_quotes =
        value.is_empty() || value.starts_with(['"', '\'']) || has_outer_whitespace(value);
    if !needs_quotes {
        return Ok(value.to_string());
    }

    // One layer is stripped on read, so any content survives as long as the
    // quoted form does not open a triple-quoted value.
    let quoted = format!("\"{value}\"");
    if TripleQuote::opening(&quoted).is_none() {
        return Ok(quoted);
    }
    // starts with `""` or is a lone `"`; single quotes cannot open a triple here
    Ok(format!("'{value}'"))
}

fn format_multiline(key: &str, value: &str, section: Section<'_>) -> Result<String> {
    let unrepresentable = || WriteError::UnrepresentableValue {
        key: key.to_string(),
        path: section.dotted_path(),
    };

    let quote = [TripleQuote::Double, TripleQuote::Single]
        .into_iter()
        .find(|quote| !value.contains(quote.delimiter()))
        .ok_or_else(unrepresentable)?;

    // The opening line is trimmed on read, unlike the continuation lines.
    let first_line = value.split('\n').next().unwrap_or_default();
    if value.contains('\r') || first_line.ends_with(char::is_whitespace) {
        return Err(unrepresentable().into());
    }

    let delimiter = quote.delimiter();
    Ok(format!("{delimiter}{value}{delimiter}"))
}

fn format_section_name(name: &str, parent: Section<'_>) -> Result<String> {
    let unrepresentable = || WriteError::UnrepresentableSection {
        name: name.to_string(),
        path: parent.dotted_path(),
    };

    if name.trim().is_empty() || name.contains(['\n', '\r']) {
        return Err(unrepresentable().into());
    }

    let needs_quotes = name.starts_with(['"', '\''])
        || name.contains(['[', ']'])
        || has_outer_whitespace(name);
    if !needs_quotes {
        return Ok(name.to_string());
    }
    quote_with_free_char(name).ok_or_else(|| unrepresentable().into())
}

/// Wraps `text` in whichever quote character it does not contain.
fn quote_with_free_char(text: &str) -> Option<String> {
    ['"', '\'']
        .into_iter()
        .find(|&quote| !text.contains(quote))
        .map(|quote| format!("{quote}{text}{quote}"))
}

fn has_outer_whitespace(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use crate::document::ConfigObj;
    use crate::error::{ConfigObjError, WriteError};

    fn round_trip(document: &ConfigObj) -> ConfigObj {
        let text = document.to_config_string().unwrap();
        ConfigObj::parse_str(&text)
    }

    #[test]
    fn test_render_layout() {
        let document = ConfigObj::parse_str(
            "name = demo\n[server]\nport = 8080\n[[tls]]\ncert = a.pem\n[client]\nretries = 3",
        );
        let text = document.to_config_string().unwrap();
        assert_eq!(
            text,
            "name = demo\n\
             \n\
             [server]\n\
             port = 8080\n\
             \n    [[tls]]\n    cert = a.pem\n\
             \n\
             [client]\n\
             retries = 3\n"
        );
    }

    #[test]
    fn test_quoting_round_trips() {
        let mut document = ConfigObj::new();
        document.set_value("plain", "value");
        document.set_value("empty", "");
        document.set_value("padded", "  spaced  ");
        document.set_value("quoted", "\"already quoted\"");
        document.set_value("two quotes", "\"\"x");
        document.set_value("apostrophe", "it's");
        document.set_value("a=b", "equals in key");
        document.set_value("# hash", "comment-like key");
        document.set_value("with comment", "x # stays");
        assert_eq!(round_trip(&document), document);
    }

    #[test]
    fn test_multiline_round_trips() {
        let mut document = ConfigObj::new();
        document.set_value("text", "\nline one\n  line two\n");
        document.set_value("has_double", "a\n\"\"\" inside\nb");
        document.set_value("tail", "first\nlast line # with hash");
        assert_eq!(round_trip(&document), document);
    }

    #[test]
    fn test_section_names_round_trip() {
        let mut document = ConfigObj::new();
        let id = document.add_section(" padded ");
        document
            .section_by_id_mut(id)
            .unwrap()
            .add_child("with [brackets]");
        document.add_section("it's");
        document.add_section("\"quoted\"");
        assert_eq!(round_trip(&document), document);
    }

    #[test]
    fn test_unrepresentable_key() {
        let mut document = ConfigObj::new();
        document.set_value("\"edge\"", "x");
        let err = document.to_config_string().unwrap_err();
        assert!(matches!(
            err,
            ConfigObjError::Write(WriteError::UnrepresentableKey { .. })
        ));
    }

    #[test]
    fn test_unrepresentable_multiline_value() {
        let mut document = ConfigObj::new();
        let id = document.add_section("s");
        document
            .section_by_id_mut(id)
            .unwrap()
            .set_value("k", "'''\n\"\"\"");
        match document.to_config_string() {
            Err(ConfigObjError::Write(WriteError::UnrepresentableValue { key, path })) => {
                assert_eq!(key, "k");
                assert_eq!(path, "s");
            }
            other => panic!("Expected UnrepresentableValue, got: {:?}", other),
        }
    }

    #[test]
    fn test_unrepresentable_section_name() {
        let mut document = ConfigObj::new();
        document.add_section("   ");
        assert!(matches!(
            document.to_config_string(),
            Err(ConfigObjError::Write(
                WriteError::UnrepresentableSection { .. }
            ))
        ));
    }
}
