//! Diagnostics and bookkeeping for one run.
//!
//! [`ProcessResult`] plays two roles. It is the diagnostics sink, collecting
//! one [`Warning`] per failed token, and it is the context handed to a custom
//! `relative_path` function, which can read `output_file` to compute
//! references from the stylesheet's real output location.

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

use crate::constants::PLUGIN_NAME;
use crate::stylesheet::{Declaration, SourceLocation};

/// A non-fatal problem attributed to one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Human readable message, e.g. `icon.svg ignored.`
    pub message: String,
    /// Property of the declaration the token belongs to
    pub prop: String,
    /// Location of the declaration, when the host provided one
    pub source: Option<SourceLocation>,
    /// Name of the component that produced the warning
    pub plugin: &'static str,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(SourceLocation {
            input_file: Some(file),
            line,
            column,
        }) = &self.source
        {
            write!(f, "{}:{line}:{column}: ", file.display())?;
        }
        write!(f, "{}: {}", self.plugin, self.message)
    }
}

/// A token that was successfully rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    /// Source file that was referenced
    pub source: PathBuf,
    /// Destination the reference now points to
    pub destination: PathBuf,
    /// `true` when this run created the destination file
    pub written: bool,
}

/// Everything a run reports back to the host.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessResult {
    /// Per-token failures, in the order declarations were processed
    pub warnings: Vec<Warning>,
    /// Rewritten references, in the order declarations were processed
    pub assets: Vec<AssetRecord>,
    /// Where the host will write the processed stylesheet, if known
    pub output_file: Option<PathBuf>,
}

impl ProcessResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Result context for a stylesheet that will be written to `output_file`.
    pub fn with_output_file(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: Some(output_file.into()),
            ..Self::default()
        }
    }

    /// Attaches a warning to `declaration`.
    pub fn warn(&mut self, declaration: &Declaration, message: impl Into<String>) {
        let warning = Warning {
            message: message.into(),
            prop: declaration.prop.clone(),
            source: declaration.source.clone(),
            plugin: PLUGIN_NAME,
        };
        warn!("{warning}");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of destination files created by this run.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.assets.iter().filter(|record| record.written).count()
    }

    /// Prints the warnings to stderr with color.
    pub fn display_warnings(&self) {
        for warning in &self.warnings {
            eprintln!("{}: {}", "warning".yellow().bold(), warning.message);
            if let Some(SourceLocation {
                input_file: Some(file),
                line,
                column,
            }) = &warning.source
            {
                eprintln!("  {} {}:{}:{}", "-->".blue(), file.display(), line, column);
            }
            eprintln!("  {} {}", "in".dimmed(), warning.prop);
        }
    }
}
