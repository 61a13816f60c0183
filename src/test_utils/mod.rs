//! Test utilities for url-copy
//!
//! Helpers shared by the unit tests and the integration suite:
//!
//! - [`init_test_logging`] - one-time tracing setup for tests
//! - [`AssetFixture`] - a temporary project with a source and a destination root
//!
//! # Example
//!
//! ```rust,no_run
//! use url_copy::test_utils::AssetFixture;
//!
//! # fn example() -> anyhow::Result<()> {
//! let fixture = AssetFixture::new()?;
//! fixture.add_file("img/logo.png", b"png")?;
//! let decl = fixture.declaration("css/main.css", "background", "url(../img/logo.png)");
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::AssetFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// This function initializes the tracing subscriber for tests, but only once
/// regardless of how many times it's called. It respects the `RUST_LOG` environment
/// variable if set, or uses the provided log level.
///
/// # Arguments
///
/// * `level` - Optional log level to use. If None, uses `RUST_LOG` environment variable
///
/// # Example
///
/// ```rust,no_run
/// use tracing::Level;
///
/// #[test]
/// fn my_test() {
///     // Initialize logging with RUST_LOG if set, otherwise no logging
///     url_copy::test_utils::init_test_logging(None);
///
///     // Or set level programmatically
///     url_copy::test_utils::init_test_logging(Some(Level::DEBUG));
/// }
/// ```
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=url_copy=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
