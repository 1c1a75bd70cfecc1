//! Configuration loading and validation.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    catalog::CATALOG_FILE_NAME,
    error::{Error, Result},
    paths,
    reconcile::{Corrections, default_corrections},
};

/// Parsed configuration for the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Configured skills root, already expanded.
    root: Option<PathBuf>,
    /// Catalog file name under the root.
    catalog: String,
    /// Built-in corrections merged with configured ones.
    corrections: Corrections,
}

/// Raw config file structure.
#[derive(Debug, Deserialize)]
struct RawConfig {
    /// Skills root, relative to the config file.
    root: Option<String>,
    /// Catalog file name.
    catalog: Option<String>,
    /// Extra or overriding category corrections.
    corrections: Option<BTreeMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            catalog: CATALOG_FILE_NAME.to_string(),
            corrections: default_corrections(),
        }
    }
}

impl Config {
    /// Load an explicit config file, or the default one when it exists.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let Ok(path) = paths::default_config_path() else {
            return Ok(Self::default());
        };
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load a config file from an explicit path.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| Error::ConfigRead {
            path: path.to_path_buf(),
            source: error,
        })?;

        let raw: RawConfig = toml::from_str(&contents).map_err(|error| Error::ConfigParse {
            path: path.to_path_buf(),
            source: error,
        })?;

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let root = raw
            .root
            .map(|root| paths::expand_path(&root, base_dir))
            .transpose()?;

        let mut corrections = default_corrections();
        corrections.extend(raw.corrections.unwrap_or_default());

        Ok(Self {
            root,
            catalog: raw.catalog.unwrap_or_else(|| CATALOG_FILE_NAME.to_string()),
            corrections,
        })
    }

    /// Return the configured root, if any.
    pub(crate) fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Return the catalog file name.
    pub(crate) fn catalog(&self) -> &str {
        &self.catalog
    }

    /// Return the category corrections to apply.
    pub(crate) fn corrections(&self) -> &Corrections {
        &self.corrections
    }
}
