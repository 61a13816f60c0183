//! Reference rewriting.
//!
//! The new reference is the path from a "relative base" directory to the
//! copied asset. By default the base mirrors the stylesheet's position: a
//! stylesheet at `<src>/css/site.css` is assumed to be emitted to
//! `<dest>/css/site.css`, so references are computed from `<dest>/css`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset::AssetMetadata;
use crate::config::ResolvedOptions;
use crate::stylesheet::ProcessResult;
use crate::utils::{normalize_path, relative_path, to_url_path};

/// Override for the relative base directory.
///
/// Called with `(declaration_dir, metadata, result, options)`; returns the
/// directory rewritten references should be relative to.
pub type RelativePathFn = Arc<
    dyn Fn(&Path, &AssetMetadata, &ProcessResult, &ResolvedOptions) -> PathBuf + Send + Sync,
>;

/// Turns a copied asset back into a `url()` value.
pub struct ReferenceRewriter<'a> {
    options: &'a ResolvedOptions,
}

impl<'a> ReferenceRewriter<'a> {
    /// Creates a rewriter for the given resolved options.
    #[must_use]
    pub const fn new(options: &'a ResolvedOptions) -> Self {
        Self {
            options,
        }
    }

    /// Directory that rewritten references are relative to.
    #[must_use]
    pub fn relative_base(
        &self,
        declaration_dir: &Path,
        metadata: &AssetMetadata,
        result: &ProcessResult,
    ) -> PathBuf {
        let declaration_dir = normalize_path(&self.options.working_dir.join(declaration_dir));

        match &self.options.relative_path {
            Some(custom) => normalize_path(&self.options.working_dir.join(custom(
                &declaration_dir,
                metadata,
                result,
                self.options,
            ))),
            None => normalize_path(
                &self.options.dest.join(relative_path(&metadata.source_root, &declaration_dir)),
            ),
        }
    }

    /// Computes the replacement reference for `destination`.
    ///
    /// Always uses `/` separators and ends with the original `url_suffix`.
    #[must_use]
    pub fn rewrite(
        &self,
        declaration_dir: &Path,
        metadata: &AssetMetadata,
        destination: &Path,
        result: &ProcessResult,
    ) -> String {
        let base = self.relative_base(declaration_dir, metadata, result);
        let mut value = to_url_path(relative_path(&base, destination));
        value.push_str(&metadata.url_suffix);
        value
    }
}
