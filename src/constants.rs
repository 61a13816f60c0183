//! Global constants used throughout the url-copy codebase.
//!
//! Default option values and fixed lengths live here so the configuration
//! layer, the planner, and the tests agree on a single source of truth.

/// Default destination template, relative to the destination root.
///
/// Content addressed: two references to byte-identical files collapse onto
/// the same copy.
pub const DEFAULT_TEMPLATE: &str = "assets/[hash].[ext]";

/// Number of hex characters kept from the default content digest.
pub const HASH_LENGTH: usize = 16;

/// Marker searched for before a declaration value is walked at all.
pub const URL_FUNCTION_MARKER: &str = "url(";

/// Plugin name attached to every emitted warning.
pub const PLUGIN_NAME: &str = "url-copy";
