//! Core error types for url-copy
//!
//! # Modules
//!
//! ## `error` - Fatal and per-asset errors
//!
//! - [`ConfigError`] - configuration problems that abort a run before any I/O
//! - [`AssetError`] - failures scoped to one `url()` token, reported as warnings
//!
//! ## `file_error` - File operation context
//!
//! - [`FileOperationError`] - an I/O error together with the operation, path,
//!   purpose and caller that produced it
//! - [`FileResultExt`] - attaches that context to any `io::Result`
//! - [`FileOps`] - the handful of async file operations the pipeline performs

pub mod error;
pub mod file_error;

pub use error::{AssetError, ConfigError};
pub use file_error::{
    FileOperation, FileOperationContext, FileOperationError, FileOps, FileResultExt,
};
