//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::PrinterConfig;
use crate::Result;
use crate::error::VerbatimError;

/// Config file names in discovery priority order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["verbatim.toml", "verbatim.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| VerbatimError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file, chosen by extension
    pub fn load_from_file(path: &Path) -> Result<PrinterConfig> {
        let content = fs::read_to_string(path).map_err(|e| VerbatimError::io_error(path, e))?;
        let config: PrinterConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                VerbatimError::config_error(format!(
                    "Failed to load config from '{}': {e}",
                    path.display()
                ))
            })?,
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                VerbatimError::config_error(format!(
                    "Failed to load config from '{}': {e}",
                    path.display()
                ))
            })?,
            _ => {
                return Err(VerbatimError::config_error(format!(
                    "Unsupported config format: {}",
                    path.display()
                )));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit path, or auto-discover from `start_dir`
    /// (default: the current directory). Falls back to defaults when nothing
    /// is found.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<PrinterConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(VerbatimError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(PrinterConfig::default())
            }
        }
    }
}
