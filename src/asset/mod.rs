//! Per-asset pipeline stages.
//!
//! A normal `url()` reference passes through four stages, each owned by one
//! module:
//!
//! 1. [`resolver`] - locate the file under a source root, read and hash it
//! 2. [`planner`] - render the destination path from the template
//! 3. [`copier`] - idempotent, create-if-absent copy into the destination root
//! 4. [`rewrite`] - compute the new reference relative to the stylesheet output
//!
//! [`hash`] holds the default content hashing strategy.
//!
//! All stages exchange a single [`AssetMetadata`] value. It is created by the
//! resolver, gains its destination in the copier and is discarded once the
//! reference has been rewritten.

pub mod copier;
pub mod hash;
pub mod planner;
pub mod resolver;
pub mod rewrite;

use std::path::PathBuf;

pub use copier::{AssetCopier, CollisionPolicy, TransformFn};
pub use hash::{HashFunction, default_hash};
pub use planner::{CompiledTemplate, DestinationPlanner, Template, TemplateFn};
pub use resolver::AssetResolver;
pub use rewrite::{ReferenceRewriter, RelativePathFn};

/// Everything known about one referenced asset.
///
/// One instance exists per `url()` token per run. Nothing is cached between
/// runs; the on-disk destination is the only durable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    /// Configured source root the file was found under
    pub source_root: PathBuf,
    /// Absolute path of the source file, query and fragment stripped
    pub absolute_path: PathBuf,
    /// Containing directory relative to `source_root` (empty at the root)
    pub relative_dir: PathBuf,
    /// File name including the extension, e.g. `logo.png`
    pub full_name: String,
    /// File name without the extension, e.g. `logo`
    pub base_name: String,
    /// Lower-cased extension without the leading dot, e.g. `png`
    pub extension: String,
    /// Output of the configured hash function over the file contents
    pub content_hash: String,
    /// File contents; the transform may replace them before writing
    pub raw_contents: Vec<u8>,
    /// Query string and/or fragment of the original reference, verbatim
    pub url_suffix: String,
    /// Absolute destination path, set once the asset has been planned
    pub destination_path: Option<PathBuf>,
    /// Whether the destination was already present when copying
    pub already_exists: bool,
}
