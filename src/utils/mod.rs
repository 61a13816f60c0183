//! Cross-platform path helpers
//!
//! # Modules
//!
//! - [`paths`] - lexical normalization, containment checks and relative paths
//!
//! Rewritten references always use `/` separators, whatever the host uses.

pub mod paths;

pub use paths::{is_within, normalize_path, relative_path, to_url_path};
