//! In-memory INI document
//!
//! A document is an ordered list of uniquely named sections, each holding an
//! ordered `key -> value` map. Order comes from the source text; keys and
//! sections added while editing are appended. Names are case-sensitive and
//! never normalized.

mod codec;

pub use codec::{parse, serialize};

use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Section {
    name: String,
    entries: IndexMap<String, String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite a value. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Equality is order-sensitive: two sections with the same entries in a
// different order are different documents on disk.
impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Section {}

#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a document from disk. Nothing is returned on failure.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document = parse(&text)?;
        info!(path = %path.display(), sections = document.len(), "Loaded document");
        Ok(document)
    }

    /// Serialize the whole document and write it to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serialize(self)).map_err(|e| Error::io(path, e))
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Return the named section, appending an empty one first if absent.
    /// Never creates a second section with the same name.
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.ensure_section(section).set(key, value);
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.sections.values().eq(other.sections.values())
    }
}

impl Eq for Document {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_section_is_idempotent() {
        let mut doc = Document::new();
        doc.ensure_section("NET").set("PORT", "80");
        doc.ensure_section("NET");
        doc.ensure_section("NET");

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("NET", "PORT"), Some("80"));
    }

    #[test]
    fn test_set_keeps_key_position() {
        let mut section = Section::new("A");
        section.set("first", "1");
        section.set("second", "2");
        section.set("first", "updated");

        let keys: Vec<_> = section.iter().collect();
        assert_eq!(keys, vec![("first", "updated"), ("second", "2")]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut doc = Document::new();
        doc.set("Net", "Port", "1");
        doc.set("NET", "PORT", "2");

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("Net", "Port"), Some("1"));
        assert_eq!(doc.get("Net", "PORT"), None);
        assert_eq!(doc.get("NET", "PORT"), Some("2"));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut a = Document::new();
        a.set("S", "x", "1");
        a.set("S", "y", "2");

        let mut b = Document::new();
        b.set("S", "y", "2");
        b.set("S", "x", "1");

        assert_ne!(a, b);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(&path, "[General]\nName = demo\n").unwrap();

        let mut doc = Document::load(&path).unwrap();
        assert_eq!(doc.get("General", "Name"), Some("demo"));

        doc.set("General", "Mode", "fast");
        doc.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[General]\nName=demo\nMode=fast\n\n");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(&dir.path().join("absent.ini")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
