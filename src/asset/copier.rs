//! Idempotent asset copies.
//!
//! An existing destination is never rewritten: it is the only de-duplication
//! mechanism between runs. New files are written to a temporary sibling and
//! moved into place without replacing anything, so a destination is either
//! complete or absent. Of two tokens racing for the same destination the
//! loser simply observes the file as already present.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::asset::AssetMetadata;
use crate::core::{AssetError, FileOps};

const CALLER: &str = "asset_copier";

/// Content transform applied before a new destination is written.
///
/// Receives the metadata by value and returns it, usually with
/// `raw_contents` replaced.
pub type TransformFn =
    Arc<dyn Fn(AssetMetadata) -> BoxFuture<'static, anyhow::Result<AssetMetadata>> + Send + Sync>;

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the existing file and reuse it
    #[default]
    Skip,
    /// Keep the existing file, but fail the asset when its bytes differ from
    /// what would have been written
    Verify,
}

/// Copies planned assets into the destination tree.
pub struct AssetCopier<'a> {
    transform: Option<&'a TransformFn>,
    collision: CollisionPolicy,
}

impl<'a> AssetCopier<'a> {
    /// Creates a copier with an optional transform and a collision policy.
    #[must_use]
    pub const fn new(transform: Option<&'a TransformFn>, collision: CollisionPolicy) -> Self {
        Self {
            transform,
            collision,
        }
    }

    /// Copies `metadata` to `destination` unless something is already there.
    ///
    /// The destination is recorded in `destination_path` before the
    /// transform runs. `already_exists` is set when the file was present,
    /// including when a concurrent writer created it first.
    ///
    /// # Errors
    ///
    /// - [`AssetError::Write`] when the directories or the file cannot be created
    /// - [`AssetError::Transform`] when the transform fails
    /// - [`AssetError::DestinationConflict`] under [`CollisionPolicy::Verify`]
    ///   when the existing file holds different bytes
    pub async fn copy(
        &self,
        mut metadata: AssetMetadata,
        destination: PathBuf,
    ) -> Result<AssetMetadata, AssetError> {
        metadata.destination_path = Some(destination.clone());

        let exists =
            FileOps::exists_with_context(&destination, "checking for an existing copy", CALLER)
                .await
                .map_err(|source| AssetError::Write {
                    path: destination.clone(),
                    source,
                })?;

        if exists {
            debug!("Destination {} exists, skipping write", destination.display());
            metadata.already_exists = true;
            return self.check_existing(metadata, &destination).await;
        }

        if let Some(parent) = destination.parent() {
            FileOps::create_dir_all_with_context(parent, "creating asset directory", CALLER)
                .await
                .map_err(|source| AssetError::Write {
                    path: destination.clone(),
                    source,
                })?;
        }

        let mut metadata = self.apply_transform(metadata).await?;

        let written = FileOps::write_new_with_context(
            &destination,
            &metadata.raw_contents,
            "copying asset",
            CALLER,
        )
        .await
        .map_err(|source| AssetError::Write {
            path: destination.clone(),
            source,
        })?;

        if written {
            debug!(
                "Copied {} -> {}",
                metadata.absolute_path.display(),
                destination.display()
            );
            Ok(metadata)
        } else {
            debug!("Destination {} appeared concurrently", destination.display());
            metadata.already_exists = true;
            self.verify_contents(&metadata, &destination).await?;
            Ok(metadata)
        }
    }

    async fn apply_transform(&self, metadata: AssetMetadata) -> Result<AssetMetadata, AssetError> {
        match self.transform {
            None => Ok(metadata),
            Some(transform) => {
                let path = metadata.absolute_path.clone();
                transform(metadata).await.map_err(|source| AssetError::Transform {
                    path,
                    source,
                })
            }
        }
    }

    async fn check_existing(
        &self,
        metadata: AssetMetadata,
        destination: &Path,
    ) -> Result<AssetMetadata, AssetError> {
        match self.collision {
            CollisionPolicy::Skip => Ok(metadata),
            CollisionPolicy::Verify => {
                let metadata = self.apply_transform(metadata).await?;
                self.verify_contents(&metadata, destination).await?;
                Ok(metadata)
            }
        }
    }

    async fn verify_contents(
        &self,
        metadata: &AssetMetadata,
        destination: &Path,
    ) -> Result<(), AssetError> {
        if self.collision == CollisionPolicy::Skip {
            return Ok(());
        }

        let existing =
            FileOps::read_bytes_with_context(destination, "verifying existing copy", CALLER)
                .await
                .map_err(|source| AssetError::Unreadable {
                    path: destination.to_path_buf(),
                    source,
                })?;

        if existing == metadata.raw_contents {
            Ok(())
        } else {
            Err(AssetError::DestinationConflict {
                destination: destination.to_path_buf(),
                source_path: metadata.absolute_path.clone(),
            })
        }
    }
}
