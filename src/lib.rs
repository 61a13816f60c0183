//! url-copy - asset copying for stylesheet `url()` references
//!
//! A build step for stylesheet pipelines. For every `url()` reference in a
//! stylesheet's declarations, the referenced file is located under one of the
//! configured source roots, hashed, copied into the destination root under a
//! templated (by default content addressed) name, and the reference is
//! rewritten to point at the copy.
//!
//! The host pipeline parses the stylesheet itself and hands over its
//! declarations; url-copy never parses CSS beyond locating `url()` arguments.
//!
//! # Architecture Overview
//!
//! ```text
//! AssetPipeline::run
//!   └─ DeclarationProcessor          (one per run, all declarations joined)
//!        ├─ classify                 escaped / special / normal
//!        ├─ AssetResolver::resolve   ignore rules, source root, read, hash
//!        ├─ DestinationPlanner::plan template -> absolute destination
//!        ├─ AssetCopier::copy        create-if-absent write, transform
//!        └─ ReferenceRewriter        path relative to the stylesheet output
//! ```
//!
//! Each stage works on one [`asset::AssetMetadata`] per `url()` token. Per
//! token failures never escape: they become [`stylesheet::Warning`]s and the
//! reference is left as written. Only configuration errors fail a run.
//!
//! # Reference Kinds
//!
//! | reference | behaviour |
//! |---|---|
//! | `!img/a.png` | escape hatch: emitted as `img/a.png`, nothing copied |
//! | `/a.png`, `data:...`, `#id`, `https://...` | left untouched |
//! | anything else | resolved, copied and rewritten |
//!
//! A `?query` or `#fragment` on a normal reference is carried over to the
//! rewritten value verbatim.
//!
//! # Core Modules
//!
//! - [`processor`] - [`processor::AssetPipeline`] entry point and per-declaration fan-out
//! - [`asset`] - resolver, planner, copier and rewriter stages
//! - [`stylesheet`] - declarations in, values and diagnostics out
//! - [`config`] - option builder, TOML configuration, validated options
//! - [`classify`] - reference classification
//! - [`pattern`] - ignore rules
//! - [`core`] - error types and file operation context
//! - [`utils`] - lexical path helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use url_copy::config::CopyOptions;
//! use url_copy::processor::AssetPipeline;
//! use url_copy::stylesheet::{ProcessResult, Stylesheet};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pipeline = AssetPipeline::new(
//!     CopyOptions::new().src("src").dest("dist").template("assets/[name]-[hash].[ext]"),
//! );
//!
//! let mut sheet = Stylesheet::from_file(
//!     "src/css/main.css",
//!     [("background".to_string(), "url(../img/logo.png?v=2)".to_string())],
//! );
//! let mut result = ProcessResult::new();
//! pipeline.run(&mut sheet, &mut result).await?;
//!
//! // background: url(../assets/logo-<hash>.png?v=2)
//! # Ok(())
//! # }
//! ```

// Pipeline
pub mod asset;
pub mod processor;
pub mod stylesheet;

// Configuration and rules
pub mod classify;
pub mod config;
pub mod pattern;

// Supporting modules
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
