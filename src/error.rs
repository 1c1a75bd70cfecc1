//! Error types for the skill-index CLI.

use std::{env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult};

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for skill-index operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog file does not exist under the resolved root.
    #[error("Cannot find {path}")]
    CatalogMissing {
        /// Expected catalog location.
        path: PathBuf,
    },
    /// The catalog file could not be read.
    #[error("Failed to read catalog at {path}: {source}")]
    CatalogRead {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The catalog file is not valid JSON.
    #[error("Failed to parse catalog at {path}: {source}")]
    CatalogParse {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// The catalog parsed but does not have the expected layout.
    #[error("Invalid catalog at {path}: {message}")]
    CatalogShape {
        /// Path to the catalog file.
        path: PathBuf,
        /// Description of the layout problem.
        message: String,
    },
    /// The catalog could not be serialized.
    #[error("Failed to serialize catalog: {source}")]
    CatalogSerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// The catalog file could not be written.
    #[error("Failed to write catalog at {path}: {source}")]
    CatalogWrite {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// A registration seed file could not be read.
    #[error("Failed to read seed file at {path}: {source}")]
    SeedRead {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A registration seed file could not be parsed.
    #[error("Failed to parse seed file at {path}: {source}")]
    SeedParse {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}
