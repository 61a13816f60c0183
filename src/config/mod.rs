//! Configuration for url-copy
//!
//! Options reach the pipeline in up to three steps:
//!
//! 1. **File** (optional) - [`CopyConfig`] loaded from TOML with
//!    [`CopyConfig::load_from`], holding the data-shaped options
//! 2. **Builder** - [`CopyOptions`], where callbacks are attached
//! 3. **Resolved** - [`ResolvedOptions`], produced by
//!    [`CopyOptions::resolve`] at the start of every run
//!
//! Resolution is the single validation point. Missing `src` or `dest` and
//! malformed ignore globs are reported there as
//! [`ConfigError`](crate::core::ConfigError), before any file is touched.
//!
//! # Modules
//!
//! - `options` - builder, option shapes and the resolved form
//! - `file` - TOML model

pub mod file;
pub mod options;

pub use file::{CopyConfig, OneOrMany};
pub use options::{CopyOptions, IgnoreOption, InputPathFn, ResolvedOptions};
