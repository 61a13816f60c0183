//! TOML configuration files.
//!
//! Only the data-shaped options can be expressed in a file; callbacks
//! (`transform`, `relative_path`, custom templates, ...) are added on the
//! [`CopyOptions`] returned by [`CopyConfig::into_options`].
//!
//! ```toml
//! src = ["src", "vendor"]        # or a single string
//! dest = "dist"
//! template = "[path]/[name]-[hash].[ext]"
//! ignore = "*.svg"               # or a list of globs
//! collision = "verify"           # "skip" (default) or "verify"
//!
//! [placeholders]
//! ext = "bin"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::asset::CollisionPolicy;
use crate::config::CopyOptions;

/// A value that may be written as one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Serializable subset of the options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision: Option<CollisionPolicy>,
    /// Fallback values for empty placeholders, keyed by placeholder name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub placeholders: BTreeMap<String, String>,
}

impl CopyConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use url_copy::config::CopyConfig;
    /// use std::path::Path;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let options = CopyConfig::load_from(Path::new("url-copy.toml")).await?.into_options();
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (permissions, not found, etc.)
    /// - The file contains invalid TOML syntax
    /// - The TOML structure doesn't match the expected schema
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read url-copy config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse url-copy config from {}", path.display()))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse url-copy config")
    }

    /// Converts the file model into a builder.
    ///
    /// Validation (missing roots, bad globs) happens later, when the options
    /// are resolved at the start of a run.
    #[must_use]
    pub fn into_options(self) -> CopyOptions {
        let mut options = CopyOptions::new();

        if let Some(src) = self.src {
            options = options.sources(src.into_vec());
        }
        if let Some(dest) = self.dest {
            options = options.dest(dest);
        }
        if let Some(template) = self.template {
            options = options.template(template);
        }
        if let Some(ignore) = self.ignore {
            options = options.ignore(ignore.into_vec());
        }
        if let Some(collision) = self.collision {
            options = options.collision(collision);
        }
        for (name, value) in self.placeholders {
            options = options.placeholder_default(name, value);
        }

        options
    }
}
