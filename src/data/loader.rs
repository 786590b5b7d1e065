//! RON data loader
//!
//! Loads the draft configuration and candidate catalog from external RON
//! files, with fallback to hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::draft::DraftError;
use super::catalog::{default_catalog, Catalog};
use super::config::DraftConfig;

const CONFIG_FILE: &str = "draft.ron";
const CATALOG_FILE: &str = "catalog.ron";

/// Manages all external draft data
#[derive(Debug, Clone, Default)]
pub struct DataManager {
    /// Draft tunables
    pub config: DraftConfig,
    /// Candidate definitions
    pub catalog: Catalog,
}

/// Directories searched for data files, in priority order
pub fn data_dirs() -> Vec<PathBuf> {
    use directories::ProjectDirs;

    let mut dirs = Vec::new();
    if let Some(proj_dirs) = ProjectDirs::from("com", "draftwell", "Draftwell") {
        dirs.push(proj_dirs.config_dir().to_path_buf());
    }
    dirs.push(PathBuf::from("assets/data"));
    dirs
}

impl DataManager {
    /// Create a new DataManager, loading from files or using defaults
    pub fn new() -> Self {
        Self::load_from_dirs(&data_dirs())
    }

    /// Load each file from the first directory that has it
    pub fn load_from_dirs(dirs: &[PathBuf]) -> Self {
        let config: DraftConfig = load_first(dirs, CONFIG_FILE).unwrap_or_default();
        let catalog = load_first(dirs, CATALOG_FILE).unwrap_or_else(default_catalog);

        if let Err(e) = config.validate() {
            log::warn!("Draft config: {}; sampling proceeds over actual weights", e);
        }

        log::info!(
            "Loaded draft data: {} core, {} projectiles, {} variant sets",
            catalog.core.len(),
            catalog.projectiles.len(),
            catalog.variants.len()
        );

        Self { config, catalog }
    }

    /// Get draft configuration
    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// Get candidate catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Parse `name` from the first directory containing it
fn load_first<T: DeserializeOwned>(dirs: &[PathBuf], name: &str) -> Option<T> {
    let path = dirs.iter().map(|dir| dir.join(name)).find(|path| path.exists())?;
    match load_file(&path) {
        Ok(value) => {
            log::info!("Loaded {:?}", path);
            Some(value)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, DraftError> {
    let content = fs::read_to_string(path)
        .map_err(|e| DraftError::Data(format!("Failed to read {:?}: {}", path, e)))?;
    ron::from_str(&content)
        .map_err(|e| DraftError::Data(format!("Failed to parse {:?}: {}", path, e)))
}

/// Export default config and catalog to RON files for easy editing
pub fn export_default_data(dir: &Path) -> Result<(), DraftError> {
    fs::create_dir_all(dir)
        .map_err(|e| DraftError::Data(format!("Failed to create {:?}: {}", dir, e)))?;

    let pretty = ron::ser::PrettyConfig::default();

    let config_ron = ron::ser::to_string_pretty(&DraftConfig::default(), pretty.clone())
        .map_err(|e| DraftError::Data(format!("Failed to serialize config: {}", e)))?;
    fs::write(dir.join(CONFIG_FILE), config_ron)
        .map_err(|e| DraftError::Data(format!("Failed to write {}: {}", CONFIG_FILE, e)))?;

    let catalog_ron = ron::ser::to_string_pretty(&default_catalog(), pretty)
        .map_err(|e| DraftError::Data(format!("Failed to serialize catalog: {}", e)))?;
    fs::write(dir.join(CATALOG_FILE), catalog_ron)
        .map_err(|e| DraftError::Data(format!("Failed to write {}: {}", CATALOG_FILE, e)))?;

    Ok(())
}
