//! Text codec for the INI dialect
//!
//! Recognized lines: `[Name]` headers, `key=value` pairs (whitespace trimmed
//! around both sides of the first `=`), comments starting with `#` or `;`,
//! and blank lines. Anything else is a parse error.

use std::fmt::Write as _;

use super::{Document, Section};
use crate::constants::dialect::{BOM, COMMENT_PREFIXES, SEPARATOR};
use crate::error::{Error, Result};

pub fn parse(text: &str) -> Result<Document> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut document = Document::new();
    let mut current: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with(COMMENT_PREFIXES) {
            continue;
        }

        if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = inner.trim();
            if name.is_empty() {
                return Err(parse_error(line_no, "empty section name"));
            }
            // A repeated header re-opens the existing section
            document.ensure_section(name);
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once(SEPARATOR) else {
            return Err(parse_error(
                line_no,
                format!("expected '[section]' or 'key=value', found '{line}'"),
            ));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(parse_error(line_no, "empty key"));
        }

        let Some(section) = current.as_deref() else {
            return Err(parse_error(
                line_no,
                format!("key '{key}' appears before any section header"),
            ));
        };

        // First-seen position, last-seen value
        document.set(section, key, value.trim());
    }

    Ok(document)
}

pub fn serialize(document: &Document) -> String {
    let mut out = String::new();
    for section in document.sections() {
        write_section(&mut out, section);
    }
    out
}

fn write_section(out: &mut String, section: &Section) {
    let _ = writeln!(out, "[{}]", section.name());
    for (key, value) in section.iter() {
        let _ = writeln!(out, "{key}{SEPARATOR}{value}");
    }
    out.push('\n');
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}
