//! Resolution of a relative reference to a file under a source root.
//!
//! Resolution is lexical up to the read: the candidate path is built by
//! joining the reference onto the declaration directory and folding `.` and
//! `..`, the ignore rules and source roots are consulted, and only then is the
//! file read. A reference that is ignored or lives outside every source root
//! therefore never touches the filesystem.

use std::path::Path;
use tracing::debug;

use crate::asset::AssetMetadata;
use crate::config::ResolvedOptions;
use crate::core::{AssetError, FileOps};
use crate::utils::normalize_path;

const CALLER: &str = "asset_resolver";

/// Builds [`AssetMetadata`] for normal references.
pub struct AssetResolver<'a> {
    options: &'a ResolvedOptions,
}

impl<'a> AssetResolver<'a> {
    /// Creates a resolver over already validated options.
    #[must_use]
    pub const fn new(options: &'a ResolvedOptions) -> Self {
        Self {
            options,
        }
    }

    /// Resolves `raw_value` relative to `declaration_dir`.
    ///
    /// # Arguments
    ///
    /// * `declaration_dir` - directory of the stylesheet that holds the
    ///   declaration; relative directories are taken from the working directory
    ///   captured when the options were resolved
    /// * `raw_value` - the `url()` argument as written, possibly carrying a
    ///   `?query` and/or `#fragment`
    ///
    /// # Errors
    ///
    /// - [`AssetError::Ignored`] when the ignore rules match
    /// - [`AssetError::SourceRootNotFound`] when no source root contains the file
    /// - [`AssetError::Unreadable`] when the file cannot be read
    pub async fn resolve(
        &self,
        declaration_dir: &Path,
        raw_value: &str,
    ) -> Result<AssetMetadata, AssetError> {
        let (reference, url_suffix) = split_suffix(raw_value);

        let absolute_path =
            normalize_path(&self.options.working_dir.join(declaration_dir).join(reference));

        if self.options.ignore.should_ignore(reference, url_suffix) {
            return Err(AssetError::Ignored {
                file: reference.to_string(),
            });
        }

        let Some(source_root) =
            self.options.sources.iter().find(|root| absolute_path.starts_with(root))
        else {
            return Err(AssetError::SourceRootNotFound {
                path: absolute_path,
            });
        };

        let raw_contents =
            FileOps::read_bytes_with_context(&absolute_path, "reading referenced asset", CALLER)
                .await
                .map_err(|source| AssetError::Unreadable {
                    path: absolute_path.clone(),
                    source,
                })?;

        let content_hash = (self.options.hash_function)(&raw_contents);

        let full_name = file_name_lossy(absolute_path.file_name());
        let base_name = file_name_lossy(absolute_path.file_stem());
        let extension = absolute_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let relative_dir = absolute_path
            .parent()
            .and_then(|parent| parent.strip_prefix(source_root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        debug!(
            "Resolved '{}' to {} (root {}, hash {})",
            raw_value,
            absolute_path.display(),
            source_root.display(),
            content_hash
        );

        Ok(AssetMetadata {
            source_root: source_root.clone(),
            absolute_path,
            relative_dir,
            full_name,
            base_name,
            extension,
            content_hash,
            raw_contents,
            url_suffix: url_suffix.to_string(),
            destination_path: None,
            already_exists: false,
        })
    }
}

/// Splits a reference at the first `?` or `#` into `(path, suffix)`.
///
/// The suffix keeps its leading delimiter so it can be re-appended verbatim.
#[must_use]
pub fn split_suffix(raw_value: &str) -> (&str, &str) {
    match raw_value.find(['?', '#']) {
        Some(index) => raw_value.split_at(index),
        None => (raw_value, ""),
    }
}

fn file_name_lossy(name: Option<&std::ffi::OsStr>) -> String {
    name.map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
