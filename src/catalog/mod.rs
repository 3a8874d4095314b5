//! Field catalog for EasyINI
//!
//! This module provides the two halves of the catalog:
//! - **field**: per-file field definitions (which keys are editable, and how)
//! - **files**: the list of configured files, persisted through a **store**

pub mod field;
pub mod files;
pub mod store;

// Re-export commonly used types
pub use field::{FieldCatalog, FieldDefinition, FieldKey, FieldRow, HighlightSet, split_domain};
pub use files::{Catalog, FileEntry, FileSummary};
pub use store::{CatalogStore, JsonCatalogStore};
