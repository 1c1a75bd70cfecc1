//! Warning aggregation and diagnostic summaries.

use std::path::{Path, PathBuf};

/// A skill document that could not be read.
#[derive(Debug, Clone)]
pub struct SkippedDocument {
    /// Path to the unreadable document.
    pub(crate) path: PathBuf,
    /// Reason the document was skipped.
    pub(crate) reason: String,
}

/// Aggregates warnings and skipped documents for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Whether verbose notes are printed.
    verbose: bool,
    /// Collected warning messages.
    warnings: Vec<String>,
    /// Documents read as empty metadata.
    skipped: Vec<SkippedDocument>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            verbose,
            warnings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("Warning: {message}");
        self.warnings.push(message);
    }

    /// Print a continuation line when running verbosely.
    pub(crate) fn note(&self, message: impl Into<String>) {
        if self.verbose {
            eprintln!("{}", message.into());
        }
    }

    /// Record an unreadable document and emit the warning.
    pub(crate) fn warn_skipped(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        self.warn(format!("{} - {reason}", path.display()));
        self.skipped.push(SkippedDocument {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Number of warnings recorded so far.
    #[cfg(test)]
    pub(crate) fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Print a summary for skipped documents if any were recorded.
    pub(crate) fn print_skipped_summary(&self) {
        if self.skipped.is_empty() {
            return;
        }

        eprintln!(
            "Read {} skill documents as empty metadata:",
            self.skipped.len()
        );
        for skipped in &self.skipped {
            eprintln!("  - {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    /// Print a warning summary when warnings were emitted.
    pub(crate) fn print_warning_summary(&self) {
        if self.warnings.is_empty() {
            return;
        }

        eprintln!("Completed with {} warning(s).", self.warnings.len());
    }
}
