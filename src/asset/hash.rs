//! Content hashing strategy.
//!
//! The pipeline only sees a [`HashFunction`]: a pure `bytes -> String`
//! callable. [`default_hash`] is what is used when none is configured.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::constants::HASH_LENGTH;

/// Injectable content hash: must be deterministic in the bytes it receives.
pub type HashFunction = Arc<dyn Fn(&[u8]) -> String + Send + Sync>;

/// SHA-256 of `contents`, hex encoded and truncated to
/// [`HASH_LENGTH`](crate::constants::HASH_LENGTH) characters.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::asset::default_hash;
///
/// let hash = default_hash(b"hello");
/// assert_eq!(hash, "2cf24dba5fb0a30e");
/// ```
#[must_use]
pub fn default_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();

    let mut encoded = hex::encode(result);
    encoded.truncate(HASH_LENGTH);
    encoded
}

/// The default strategy in its injectable form.
#[must_use]
pub fn default_hash_function() -> HashFunction {
    Arc::new(default_hash)
}
