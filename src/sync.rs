//! Field-to-document synchronization
//!
//! A `SyncEngine` owns one opened file: the parsed document, the bound state
//! of every configured field, and the preview derived from both. Every
//! accepted edit is written to disk before `edit` returns.

use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

use crate::catalog::{FieldDefinition, FieldKey, FileEntry, HighlightSet};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::preview::{self, SectionView};
use crate::status::StatusLine;

/// Lifecycle of a bound field. `Edited` means the document holds a value
/// that has not (yet, or successfully) reached disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Bound,
    Edited,
    Persisted,
}

/// Which control the editing surface should offer for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Pick one of the domain values
    Choice { options: Vec<String> },
    FreeText,
}

impl Control {
    pub fn for_field(field: &FieldDefinition) -> Self {
        if field.is_constrained() {
            Control::Choice {
                options: field.domain.clone(),
            }
        } else {
            Control::FreeText
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundField {
    definition: FieldDefinition,
    value: String,
    state: FieldState,
}

impl BoundField {
    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn control(&self) -> Control {
        Control::for_field(&self.definition)
    }

    /// A constrained field whose stored value is not one of its choices.
    /// The value is shown as-is; it is never snapped to the domain.
    pub fn out_of_domain(&self) -> bool {
        !self.value.is_empty() && !self.definition.allows(&self.value)
    }
}

/// Current value of `field` in `document`, or `""` when the key is absent.
/// A missing section is created (empty) right away.
pub fn bind(field: &FieldDefinition, document: &mut Document) -> String {
    document
        .ensure_section(&field.section)
        .get(&field.option)
        .unwrap_or_default()
        .to_string()
}

pub struct SyncEngine {
    entry: FileEntry,
    document: Document,
    fields: IndexMap<FieldKey, BoundField>,
    highlight: HighlightSet,
    preview: Vec<SectionView>,
    status: Option<StatusLine>,
}

impl SyncEngine {
    /// Load the entry's document from disk and bind its fields.
    /// Parse and IO errors abort; no partially loaded engine is returned.
    pub fn open(entry: FileEntry) -> Result<Self> {
        let document = Document::load(&entry.path)?;
        Ok(Self::from_document(entry, document))
    }

    pub fn from_document(entry: FileEntry, document: Document) -> Self {
        let highlight = entry.fields.highlight_set();
        let mut engine = Self {
            entry,
            document,
            fields: IndexMap::new(),
            highlight,
            preview: Vec::new(),
            status: None,
        };

        let definitions = engine.entry.fields.list_fields().to_vec();
        for field in &definitions {
            engine.bind(field);
        }
        engine.refresh_preview();

        info!(
            file = %engine.entry.name,
            fields = engine.fields.len(),
            sections = engine.document.len(),
            "Opened file for editing"
        );
        engine
    }

    /// Attach the status line signalled after each successful write
    pub fn with_status(mut self, status: StatusLine) -> Self {
        self.status = Some(status);
        self
    }

    /// Bind one field to the document and track it. A later definition for
    /// the same key replaces the earlier one.
    pub fn bind(&mut self, field: &FieldDefinition) -> String {
        let value = bind(field, &mut self.document);
        let bound = BoundField {
            definition: field.clone(),
            value: value.clone(),
            state: FieldState::Bound,
        };
        if bound.out_of_domain() {
            warn!(
                field = %field.key(),
                value = %value,
                "Stored value is outside the field's domain"
            );
        }
        self.fields.insert(field.key(), bound);
        value
    }

    /// Apply a user edit: validate, mutate, re-render, write, signal.
    ///
    /// A rejected value leaves everything untouched. A failed write leaves
    /// the in-memory change in place and returns the IO error.
    pub fn edit(&mut self, key: &FieldKey, value: &str) -> Result<()> {
        {
            let bound = self.fields.get(key).ok_or_else(|| {
                Error::validation(format!(
                    "{key} is not an editable field of '{}'",
                    self.entry.name
                ))
            })?;
            bound.definition.check_value(value)?;
        }

        self.document.set(&key.section, key.option.clone(), value);
        if let Some(bound) = self.fields.get_mut(key) {
            bound.value = value.to_string();
            bound.state = FieldState::Edited;
        }
        debug!(field = %key, value = %value, "Applied edit");

        self.refresh_preview();

        if let Err(err) = self.document.save(&self.entry.path) {
            error!(field = %key, path = %self.entry.path.display(), error = %err, "Failed to write document");
            return Err(err);
        }

        if let Some(bound) = self.fields.get_mut(key) {
            bound.state = FieldState::Persisted;
        }
        if let Some(status) = self.status.as_mut() {
            status.mark_saved();
        }
        Ok(())
    }

    /// Re-read the document from disk for an updated entry, keeping the
    /// status line. On error the engine is left as it was.
    pub fn reload(&mut self, entry: FileEntry) -> Result<()> {
        let document = Document::load(&entry.path)?;
        let status = self.status.take();
        *self = Self::from_document(entry, document);
        self.status = status;
        Ok(())
    }

    fn refresh_preview(&mut self) {
        self.preview = preview::render(&self.document, &self.highlight);
    }

    pub fn entry(&self) -> &FileEntry {
        &self.entry
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn preview(&self) -> &[SectionView] {
        &self.preview
    }

    /// Bound fields in catalog order
    pub fn fields(&self) -> impl Iterator<Item = &BoundField> {
        self.fields.values()
    }

    pub fn field(&self, key: &FieldKey) -> Option<&BoundField> {
        self.fields.get(key)
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }
}
