//! Error handling for url-copy
//!
//! The error system is split along the one boundary that matters to callers:
//!
//! - [`ConfigError`] - fatal configuration problems. These are returned from
//!   [`AssetPipeline::run`](crate::processor::AssetPipeline::run) before any
//!   file I/O happens and abort the whole stylesheet.
//! - [`AssetError`] - per-asset failures (ignored file, unreadable source,
//!   source root mismatch, write failure, ...). These never cross the token
//!   boundary: the processor turns each one into a
//!   [`Warning`](crate::stylesheet::Warning) and leaves the original
//!   reference untouched.
//!
//! # Examples
//!
//! ```rust,no_run
//! use url_copy::core::{AssetError, ConfigError};
//!
//! let fatal = ConfigError::MissingSource;
//! assert_eq!(fatal.to_string(), "Option `src` is required in url-copy");
//!
//! let recoverable = AssetError::Ignored { file: "icon.svg".to_string() };
//! assert!(recoverable.is_ignored());
//! ```

use std::path::PathBuf;
use thiserror::Error;

use super::file_error::FileOperationError;

/// Fatal configuration errors.
///
/// Raised synchronously when a stylesheet run starts. A run that hits one of
/// these performs no reads or writes at all.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No source root was configured
    #[error("Option `src` is required in url-copy")]
    MissingSource,

    /// No destination root was configured
    #[error("Option `dest` is required in url-copy")]
    MissingDestination,

    /// An entry of the `ignore` list is not a valid glob
    #[error("Invalid ignore pattern '{pattern}'")]
    InvalidIgnorePattern {
        /// The pattern as written in the options
        pattern: String,
        /// Parser failure reported by the glob crate
        #[source]
        source: glob::PatternError,
    },

    /// A relative root could not be made absolute
    #[error("Cannot resolve '{}' against the working directory", .path.display())]
    WorkingDirectory {
        /// The relative root that failed to resolve
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable, per-asset errors.
///
/// Every variant is scoped to a single `url()` token. The message text is what
/// ends up in the warning attached to the declaration.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The reference matched the `ignore` option
    #[error("{file} ignored.")]
    Ignored {
        /// Reference with its query/fragment suffix stripped
        file: String,
    },

    /// The resolved path does not live under any configured source root
    #[error("\"src\" not found in {}", .path.display())]
    SourceRootNotFound {
        /// Resolved absolute path of the referenced file
        path: PathBuf,
    },

    /// The referenced file could not be read
    #[error("Can't read the file in {}", .path.display())]
    Unreadable {
        /// Resolved absolute path of the referenced file
        path: PathBuf,
        /// Read failure with operation context
        #[source]
        source: FileOperationError,
    },

    /// The declaration has no directory to resolve references against
    #[error("Cannot determine the input directory for declaration '{prop}'")]
    MissingInputPath {
        /// Property name of the declaration
        prop: String,
    },

    /// The rendered template resolved to the root itself or outside of it
    #[error("Destination {} is not inside the destination root", .path.display())]
    DestinationOutsideRoot {
        /// The offending destination
        path: PathBuf,
    },

    /// The destination (or one of its directories) could not be written
    #[error("Can't write in {}", .path.display())]
    Write {
        /// Destination that failed to be written
        path: PathBuf,
        /// Write failure with operation context
        #[source]
        source: FileOperationError,
    },

    /// The user transform rejected the asset
    #[error("Transform failed for {}: {source}", .path.display())]
    Transform {
        /// Source file being transformed
        path: PathBuf,
        /// Error returned by the transform
        source: anyhow::Error,
    },

    /// An existing destination holds different bytes than this asset
    #[error(
        "Destination {} already exists with different content than {}",
        .destination.display(),
        .source_path.display()
    )]
    DestinationConflict {
        /// Existing destination file
        destination: PathBuf,
        /// Source file that would have been written there
        source_path: PathBuf,
    },
}

impl AssetError {
    /// Whether the asset was skipped on purpose rather than failing.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }
}
