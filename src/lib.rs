#![warn(missing_docs)]
//! Library support for the skill-index CLI.

/// Catalog file model and persistence.
mod catalog;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and validation.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Unified diff rendering helpers.
mod diff;
/// Error handling for the crate.
mod error;
/// Metadata block extraction for skill documents.
mod frontmatter;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion, root resolution and display utilities.
mod paths;
/// Catalog reconciliation against skill documents.
mod reconcile;
/// Skill document discovery.
mod skill;
/// Fixtures for skill-tree tests.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, Result};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
