//! Catalog persistence
//!
//! The catalog is plain JSON (`{"files": [...]}`). A missing or unreadable
//! store is treated as an empty catalog: entries are cheap to re-add, so a
//! broken file never blocks startup.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::files::Catalog;
use crate::constants::config;
use crate::error::{Error, Result};

pub trait CatalogStore {
    fn load(&self) -> Catalog;
    fn save(&self, catalog: &Catalog) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config dir (`<config>/easyini/editor_config.json`)
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Catalog {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Catalog not found, starting empty");
                return Catalog::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read catalog, starting empty");
                return Catalog::new();
            }
        };

        match serde_json::from_str::<Catalog>(&contents) {
            Ok(catalog) => {
                info!(path = %self.path.display(), files = catalog.len(), "Loaded catalog");
                catalog
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse catalog, starting empty");
                Catalog::new()
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(catalog)
            .map_err(|e| Error::io(&self.path, std::io::Error::other(e)))?;
        fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;

        info!(path = %self.path.display(), files = catalog.len(), "Saved catalog");
        Ok(())
    }
}
