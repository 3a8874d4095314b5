//! Field definitions: which document keys are editable and how

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::constants::dialect::{COMMENT_PREFIXES, DOMAIN_SEPARATOR, SEPARATOR};
use crate::constants::exemption;
use crate::error::{Error, Result};

/// Identifies one document key: `(section, option)`, both case-sensitive
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub section: String,
    pub option: String,
}

impl FieldKey {
    pub fn new(section: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            option: option.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.option)
    }
}

/// Parses `SECTION.OPTION`, splitting on the first dot
impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((section, option)) if !section.trim().is_empty() && !option.trim().is_empty() => {
                Ok(FieldKey::new(section.trim(), option.trim()))
            }
            _ => Err(Error::validation(format!(
                "expected SECTION.OPTION, found '{s}'"
            ))),
        }
    }
}

/// Set of keys governed by field definitions, highlighted in the preview
pub type HighlightSet = HashSet<FieldKey>;

/// One editable key in a configured file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord")]
pub struct FieldDefinition {
    pub section: String,
    pub option: String,

    /// Allowed values in display order; empty means free text.
    /// Stored comma-separated on disk.
    #[serde(serialize_with = "serialize_domain")]
    pub domain: Vec<String>,

    pub display: String,

    /// Accept any text even when a domain is configured
    #[serde(default, skip_serializing_if = "is_false")]
    pub free_text: bool,
}

/// On-disk shape; `display` and `free_text` are optional in older catalogs
#[derive(Deserialize)]
struct FieldRecord {
    section: String,
    option: String,
    #[serde(default, deserialize_with = "deserialize_domain")]
    domain: Vec<String>,
    #[serde(default)]
    display: String,
    #[serde(default)]
    free_text: bool,
}

impl TryFrom<FieldRecord> for FieldDefinition {
    type Error = Error;

    fn try_from(record: FieldRecord) -> Result<Self> {
        let mut field = FieldDefinition::new(
            &record.section,
            &record.option,
            record.domain,
            Some(&record.display),
        )?;
        field.free_text = record.free_text;
        Ok(field)
    }
}

fn default_display(section: &str, option: &str) -> String {
    format!("{section}.{option}")
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Section names must survive a write/parse cycle as a `[Name]` header
fn check_section(section: &str) -> Result<()> {
    if section.is_empty() {
        return Err(Error::validation("field section must not be empty"));
    }
    if has_line_break(section) || section.contains(['[', ']']) {
        return Err(Error::validation(format!(
            "field section '{}' must not contain brackets or line breaks",
            section.escape_debug()
        )));
    }
    Ok(())
}

/// Options must be read back as the key of a `key=value` line
fn check_option(option: &str) -> Result<()> {
    if option.is_empty() {
        return Err(Error::validation("field option must not be empty"));
    }
    if has_line_break(option) || option.contains(SEPARATOR) {
        return Err(Error::validation(format!(
            "field option '{}' must not contain '{SEPARATOR}' or line breaks",
            option.escape_debug()
        )));
    }
    if option.starts_with(COMMENT_PREFIXES) || option.starts_with('[') {
        return Err(Error::validation(format!(
            "field option '{option}' would be read back as a comment or header"
        )));
    }
    Ok(())
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Split a comma-separated domain, trimming values and dropping empties
pub fn split_domain(raw: &str) -> Vec<String> {
    raw.split(DOMAIN_SEPARATOR)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_domain<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_domain(&raw))
}

fn serialize_domain<S>(domain: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let separator = DOMAIN_SEPARATOR.to_string();
    serializer.serialize_str(&domain.join(separator.as_str()))
}

impl FieldDefinition {
    /// Build a definition, rejecting an empty section or option.
    /// `display` falls back to `section.option`.
    pub fn new(
        section: &str,
        option: &str,
        domain: Vec<String>,
        display: Option<&str>,
    ) -> Result<Self> {
        let section = section.trim();
        let option = option.trim();
        check_section(section)?;
        check_option(option)?;

        let display = match display.map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => default_display(section, option),
        };

        Ok(Self {
            section: section.to_string(),
            option: option.to_string(),
            domain,
            display,
            free_text: false,
        })
    }

    pub fn key(&self) -> FieldKey {
        FieldKey::new(self.section.clone(), self.option.clone())
    }

    /// Whether the domain constraint is bypassed for this field.
    ///
    /// Either the explicit `free_text` flag is set, or the field is the
    /// `DECODE` / `CALIBRATION` pair (option compared case-insensitively).
    pub fn is_exempt(&self) -> bool {
        self.free_text
            || (self.section == exemption::SECTION
                && self.option.eq_ignore_ascii_case(exemption::OPTION))
    }

    /// Domain applies to edits of this field
    pub fn is_constrained(&self) -> bool {
        !self.domain.is_empty() && !self.is_exempt()
    }

    pub fn allows(&self, value: &str) -> bool {
        self.check_value(value).is_ok()
    }

    /// Validate a value before it reaches the document.
    ///
    /// Values are stored on a single line and trimmed on parse, so line
    /// breaks and surrounding whitespace are rejected for every field.
    /// Constrained fields also require a domain member.
    pub fn check_value(&self, value: &str) -> Result<()> {
        if has_line_break(value) {
            return Err(Error::validation(format!(
                "value for {} must be a single line",
                self.key()
            )));
        }
        if value.trim() != value {
            return Err(Error::validation(format!(
                "value for {} must not start or end with whitespace",
                self.key()
            )));
        }
        if self.is_constrained() && !self.domain.iter().any(|v| v == value) {
            return Err(Error::validation(format!(
                "'{value}' is not allowed for {} (expected one of: {})",
                self.key(),
                self.domain.join(", ")
            )));
        }
        Ok(())
    }
}

/// Raw editor row, as typed by the user before validation
#[derive(Debug, Clone, Default)]
pub struct FieldRow {
    pub section: String,
    pub option: String,
    pub domain: String,
}

/// Ordered field definitions for one file.
///
/// Duplicate `(section, option)` pairs are kept as separate rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
}

/// Stored rows that fail validation are skipped with a warning, the same
/// way `from_rows` drops incomplete editor rows.
impl<'de> Deserialize<'de> for FieldCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<FieldRecord>::deserialize(deserializer)?;
        let fields = records
            .into_iter()
            .filter_map(|record| {
                let key = default_display(&record.section, &record.option);
                FieldDefinition::try_from(record)
                    .map_err(|e| warn!(field = %key, error = %e, "Skipping invalid stored field"))
                    .ok()
            })
            .collect();
        Ok(Self { fields })
    }
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from editor rows, silently dropping rows without a section or option
    pub fn from_rows(rows: &[FieldRow]) -> Self {
        let fields = rows
            .iter()
            .filter_map(|row| {
                FieldDefinition::new(&row.section, &row.option, split_domain(&row.domain), None)
                    .ok()
            })
            .collect();
        Self { fields }
    }

    pub fn add_field(
        &mut self,
        section: &str,
        option: &str,
        domain: Vec<String>,
        display: Option<&str>,
    ) -> Result<&FieldDefinition> {
        let field = FieldDefinition::new(section, option, domain, display)?;
        self.fields.push(field);
        Ok(&self.fields[self.fields.len() - 1])
    }

    pub fn remove_field(&mut self, index: usize) -> Result<FieldDefinition> {
        if index >= self.fields.len() {
            return Err(Error::validation(format!(
                "no field at index {index} ({} fields configured)",
                self.fields.len()
            )));
        }
        Ok(self.fields.remove(index))
    }

    pub fn list_fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn highlight_set(&self) -> HighlightSet {
        self.fields.iter().map(FieldDefinition::key).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
