//! CLI command implementations.

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};

use crate::{config::Config, error::Result, paths::resolve_root};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Where to find the config and the skills root.
#[derive(Debug, Clone, Default)]
pub struct Location {
    /// Explicit skills root from the command line.
    pub root: Option<PathBuf>,
    /// Explicit config file from the command line.
    pub config: Option<PathBuf>,
}

/// Config plus the resolved root and catalog path.
#[derive(Debug)]
pub(crate) struct Resolved {
    /// Loaded configuration.
    pub(crate) config: Config,
    /// Skills root directory.
    pub(crate) root: PathBuf,
    /// Catalog file under the root.
    pub(crate) catalog_path: PathBuf,
}

impl Location {
    /// Load the config and work out which root and catalog to use.
    pub(crate) fn resolve(&self) -> Result<Resolved> {
        let config = Config::load(self.config.as_deref())?;
        let root = resolve_root(self.root.as_deref(), config.root(), config.catalog());
        let catalog_path = root.join(config.catalog());
        Ok(Resolved {
            config,
            root,
            catalog_path,
        })
    }
}

// Command modules are ordered alphabetically - maintain this order.
/// Register command implementation.
pub mod register;
/// Sync command implementation.
pub mod sync;
