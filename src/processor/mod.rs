//! Orchestration of the asset pipeline.
//!
//! - [`pipeline`] - [`AssetPipeline`], the entry point invoked per stylesheet.
//!   It validates the options once per run and fans out over declarations.
//! - [`declaration`] - [`DeclarationProcessor`], which fans out over the
//!   `url()` arguments of one declaration and folds their outcomes back into
//!   the value.

pub mod declaration;
pub mod pipeline;

pub use declaration::{DeclarationOutcome, DeclarationProcessor, TokenOutcome};
pub use pipeline::AssetPipeline;
