//! Catalog of configured files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::field::FieldCatalog;
use crate::error::{Error, Result};

/// One configured file: where it lives and which of its keys are editable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub fields: FieldCatalog,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            fields: FieldCatalog::new(),
        }
    }

    /// "N fields" label for listings
    pub fn fields_label(&self) -> String {
        format!("{} fields", self.fields.len())
    }
}

/// Listing row: name, path and the "N fields" label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub path: PathBuf,
    pub fields: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file with no fields.
    ///
    /// Name and path must be non-empty, the path must exist, and neither the
    /// name nor the path may already be configured.
    pub fn add_file(&mut self, name: &str, path: &Path) -> Result<&FileEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("file name must not be empty"));
        }
        if path.as_os_str().is_empty() {
            return Err(Error::validation("file path must not be empty"));
        }
        if !path.exists() {
            return Err(Error::validation(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
        if self.files.iter().any(|f| f.path == path) {
            return Err(Error::validation(format!(
                "file already configured: {}",
                path.display()
            )));
        }
        if self.find(name).is_some() {
            return Err(Error::validation(format!("name already in use: {name}")));
        }

        self.files.push(FileEntry::new(name, path));
        info!(name = %name, path = %path.display(), "Added file to catalog");
        Ok(&self.files[self.files.len() - 1])
    }

    /// Remove every entry called `name`; a hand-edited catalog may hold
    /// more than one.
    pub fn remove_file(&mut self, name: &str) -> Result<Vec<FileEntry>> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.files.drain(..).partition(|f| f.name == name);
        self.files = kept;
        if removed.is_empty() {
            return Err(Error::validation(format!("no configured file named '{name}'")));
        }
        info!(name = %name, entries = removed.len(), "Removed file from catalog");
        Ok(removed)
    }

    /// Replace a file's fields wholesale; a non-empty `new_path` also moves it
    pub fn save_fields(
        &mut self,
        name: &str,
        fields: FieldCatalog,
        new_path: Option<&Path>,
    ) -> Result<&FileEntry> {
        let entry = self
            .files
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::validation(format!("no configured file named '{name}'")))?;

        entry.fields = fields;
        if let Some(path) = new_path.filter(|p| !p.as_os_str().is_empty()) {
            entry.path = path.to_path_buf();
        }
        info!(name = %name, fields = entry.fields.len(), path = %entry.path.display(), "Saved fields");
        Ok(&*entry)
    }

    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn summaries(&self) -> Vec<FileSummary> {
        self.files
            .iter()
            .map(|f| FileSummary {
                name: f.name.clone(),
                path: f.path.clone(),
                fields: f.fields_label(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ini_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "[Main]\nKey=1\n").unwrap();
        path
    }

    #[test]
    fn test_add_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = ini_file(dir.path(), "a.ini");
        let mut catalog = Catalog::new();

        let entry = catalog.add_file("  Alpha ", &path).unwrap();
        assert_eq!(entry.name, "Alpha");
        assert!(entry.fields.is_empty());
        assert_eq!(entry.fields_label(), "0 fields");
        assert_eq!(catalog.names(), vec!["Alpha"]);
    }

    #[test]
    fn test_add_file_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = ini_file(dir.path(), "a.ini");
        let mut catalog = Catalog::new();

        assert!(matches!(catalog.add_file("", &path), Err(Error::Validation(_))));
        assert!(matches!(
            catalog.add_file("Missing", &dir.path().join("nope.ini")),
            Err(Error::Validation(_))
        ));

        catalog.add_file("Alpha", &path).unwrap();
        // Same path under another name
        assert!(matches!(catalog.add_file("Beta", &path), Err(Error::Validation(_))));
        // Same name for another path
        let other = ini_file(dir.path(), "b.ini");
        assert!(matches!(catalog.add_file("Alpha", &other), Err(Error::Validation(_))));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::new();
        catalog.add_file("Alpha", &ini_file(dir.path(), "a.ini")).unwrap();
        catalog.add_file("Beta", &ini_file(dir.path(), "b.ini")).unwrap();

        let removed = catalog.remove_file("Alpha").unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "Alpha");
        assert_eq!(catalog.names(), vec!["Beta"]);
        assert!(matches!(catalog.remove_file("Alpha"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_remove_file_drops_every_match() {
        // Duplicate names can only come from a hand-edited store
        let mut catalog = Catalog {
            files: vec![
                FileEntry::new("Dup", "/a.ini"),
                FileEntry::new("Keep", "/b.ini"),
                FileEntry::new("Dup", "/c.ini"),
            ],
        };

        let removed = catalog.remove_file("Dup").unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[1].path, PathBuf::from("/c.ini"));
        assert_eq!(catalog.names(), vec!["Keep"]);
        assert!(catalog.remove_file("Dup").is_err());
    }

    #[test]
    fn test_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = ini_file(dir.path(), "a.ini");
        let mut catalog = Catalog::new();
        catalog.add_file("Alpha", &path).unwrap();
        let mut fields = FieldCatalog::new();
        fields.add_field("Main", "Key", vec![], None).unwrap();
        fields.add_field("Main", "Other", vec![], None).unwrap();
        catalog.save_fields("Alpha", fields, None).unwrap();

        assert_eq!(
            catalog.summaries(),
            vec![FileSummary {
                name: "Alpha".to_string(),
                path,
                fields: "2 fields".to_string(),
            }]
        );
        assert!(Catalog::new().summaries().is_empty());
    }

    #[test]
    fn test_save_fields_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::new();
        catalog.add_file("Alpha", &ini_file(dir.path(), "a.ini")).unwrap();

        let mut first = FieldCatalog::new();
        first.add_field("A", "x", vec![], None).unwrap();
        first.add_field("A", "y", vec![], None).unwrap();
        catalog.save_fields("Alpha", first, None).unwrap();

        let mut second = FieldCatalog::new();
        second.add_field("B", "z", vec![], None).unwrap();
        let moved = dir.path().join("moved.ini");
        let entry = catalog.save_fields("Alpha", second, Some(&moved)).unwrap();

        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.fields.list_fields()[0].section, "B");
        assert_eq!(entry.path, moved);
    }

    #[test]
    fn test_save_fields_empty_path_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = ini_file(dir.path(), "a.ini");
        let mut catalog = Catalog::new();
        catalog.add_file("Alpha", &path).unwrap();

        let entry = catalog
            .save_fields("Alpha", FieldCatalog::new(), Some(Path::new("")))
            .unwrap();
        assert_eq!(entry.path, path);
        assert!(catalog.save_fields("Nope", FieldCatalog::new(), None).is_err());
    }
}
