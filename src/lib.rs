//! EasyINI: edit a curated set of INI keys through typed fields
//!
//! - **document**: INI parser/writer and the in-memory document
//! - **catalog**: configured files and their field definitions
//! - **sync**: binds fields to a live document and writes every edit
//! - **preview**: highlighted read-only view of the whole document
//! - **status**: "saved" status with a delayed revert

pub mod catalog;
pub mod collaborators;
pub mod constants;
pub mod document;
pub mod error;
pub mod preview;
pub mod status;
pub mod sync;

pub use catalog::{Catalog, CatalogStore, FieldCatalog, FieldDefinition, FieldKey, FileEntry, JsonCatalogStore};
pub use document::Document;
pub use error::{Error, Result};
pub use sync::SyncEngine;
