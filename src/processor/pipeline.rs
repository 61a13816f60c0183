//! The externally invoked entry point.

use futures::future::join_all;
use tracing::{debug, info};

use crate::config::{CopyConfig, CopyOptions, ResolvedOptions};
use crate::constants::URL_FUNCTION_MARKER;
use crate::core::ConfigError;
use crate::processor::DeclarationProcessor;
use crate::stylesheet::{Declaration, ProcessResult, Stylesheet};

/// Copies the assets referenced by a stylesheet and rewrites the references.
///
/// The pipeline holds unvalidated [`CopyOptions`]; they are resolved again at
/// the start of every run, so configuration problems surface per run and
/// before any I/O.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::config::CopyOptions;
/// use url_copy::processor::AssetPipeline;
/// use url_copy::stylesheet::{ProcessResult, Stylesheet};
///
/// # async fn example() -> anyhow::Result<()> {
/// let pipeline = AssetPipeline::new(CopyOptions::new().src("src").dest("dist"));
///
/// let mut sheet = Stylesheet::from_file(
///     "src/css/main.css",
///     [("background".to_string(), "url(../img/logo.png)".to_string())],
/// );
/// let mut result = ProcessResult::new();
/// pipeline.run(&mut sheet, &mut result).await?;
///
/// result.display_warnings();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AssetPipeline {
    options: CopyOptions,
}

impl AssetPipeline {
    #[must_use]
    pub const fn new(options: CopyOptions) -> Self {
        Self {
            options,
        }
    }

    /// Builds a pipeline from a configuration file model.
    #[must_use]
    pub fn from_config(config: CopyConfig) -> Self {
        Self::new(config.into_options())
    }

    #[must_use]
    pub const fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Processes every declaration of `stylesheet` that contains `url(`.
    ///
    /// Declarations are dispatched together and joined; per-token failures
    /// become warnings in `result` and never fail the run.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the options are invalid. Nothing is read
    /// or written in that case.
    pub async fn run(
        &self,
        stylesheet: &mut Stylesheet,
        result: &mut ProcessResult,
    ) -> Result<(), ConfigError> {
        let options = self.options.resolve()?;
        process_declarations(&options, &mut stylesheet.declarations, result).await;
        Ok(())
    }

    /// Processes a single declaration.
    ///
    /// # Errors
    ///
    /// Same as [`AssetPipeline::run`].
    pub async fn run_declaration(
        &self,
        declaration: &mut Declaration,
        result: &mut ProcessResult,
    ) -> Result<(), ConfigError> {
        let options = self.options.resolve()?;
        process_declarations(&options, std::slice::from_mut(declaration), result).await;
        Ok(())
    }
}

async fn process_declarations(
    options: &ResolvedOptions,
    declarations: &mut [Declaration],
    result: &mut ProcessResult,
) {
    let processor = DeclarationProcessor::new(options);
    let warnings_before = result.warnings.len();
    let assets_before = result.assets.len();

    let outcomes = {
        let context: &ProcessResult = result;
        let processor = &processor;
        let futures = declarations
            .iter()
            .enumerate()
            .filter(|(_, declaration)| declaration.value.contains(URL_FUNCTION_MARKER))
            .map(|(index, declaration)| async move {
                (index, processor.process(declaration, context).await)
            });
        join_all(futures).await
    };

    debug!("Processed {} declaration(s) containing url()", outcomes.len());

    for (index, outcome) in outcomes {
        outcome.apply(&mut declarations[index], result);
    }

    info!(
        "url-copy: {} asset reference(s) rewritten, {} warning(s)",
        result.assets.len() - assets_before,
        result.warnings.len() - warnings_before
    );
}
