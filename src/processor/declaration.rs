//! Processing of a single declaration.
//!
//! Every `url()` argument in the value becomes one future. The futures run
//! concurrently and each returns a [`TokenOutcome`] instead of failing, so a
//! broken reference can never disturb its siblings. Outcomes are applied to
//! the parsed value in token order once all of them have settled.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::asset::{AssetCopier, AssetResolver, DestinationPlanner, ReferenceRewriter};
use crate::classify::{UrlKind, classify};
use crate::config::ResolvedOptions;
use crate::core::AssetError;
use crate::stylesheet::{AssetRecord, Declaration, ParsedValue, ProcessResult};

/// What happened to one `url()` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Escaped reference; the `!` was removed and nothing was copied
    Unescaped(String),
    /// Special reference (absolute, data URI, fragment, `scheme://`)
    Untouched,
    /// Asset copied and reference rewritten
    Rewritten {
        value: String,
        record: AssetRecord,
    },
    /// Per-asset failure; the reference stays as written
    Failed(String),
}

/// The combined effect of processing one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationOutcome {
    /// Serialized value, when at least one token changed
    pub value: Option<String>,
    /// Warning messages, in token order
    pub warnings: Vec<String>,
    /// Rewritten assets, in token order
    pub assets: Vec<AssetRecord>,
}

impl DeclarationOutcome {
    /// Applies the outcome to `declaration` and records it in `result`.
    pub fn apply(self, declaration: &mut Declaration, result: &mut ProcessResult) {
        if let Some(value) = self.value {
            declaration.value = value;
        }
        for message in self.warnings {
            result.warn(declaration, message);
        }
        result.assets.extend(self.assets);
    }
}

/// Runs the asset pipeline for every `url()` argument of a declaration.
pub struct DeclarationProcessor<'a> {
    options: &'a ResolvedOptions,
    resolver: AssetResolver<'a>,
    planner: DestinationPlanner<'a>,
    copier: AssetCopier<'a>,
    rewriter: ReferenceRewriter<'a>,
}

impl<'a> DeclarationProcessor<'a> {
    /// Wires the resolver, planner, copier and rewriter to `options`.
    #[must_use]
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self {
            options,
            resolver: AssetResolver::new(options),
            planner: DestinationPlanner::new(&options.dest, &options.template),
            copier: AssetCopier::new(options.transform.as_ref(), options.collision),
            rewriter: ReferenceRewriter::new(options),
        }
    }

    /// Processes all `url()` arguments of `declaration` concurrently.
    ///
    /// `result` is only read, as context for a custom `relative_path`.
    pub async fn process(
        &self,
        declaration: &Declaration,
        result: &ProcessResult,
    ) -> DeclarationOutcome {
        let mut parsed = ParsedValue::parse(&declaration.value);
        if parsed.tokens().is_empty() {
            return DeclarationOutcome::default();
        }

        let declaration_dir = (self.options.input_path)(declaration);
        debug!(
            "Processing {} url() argument(s) in '{}'",
            parsed.tokens().len(),
            declaration.prop
        );

        let outcomes = join_all(parsed.tokens().iter().map(|token| {
            self.process_token(&declaration.prop, declaration_dir.as_deref(), &token.value, result)
        }))
        .await;

        let mut outcome = DeclarationOutcome::default();
        let mut changed = false;
        for (token, token_outcome) in parsed.tokens_mut().iter_mut().zip(outcomes) {
            match token_outcome {
                TokenOutcome::Untouched => {}
                TokenOutcome::Unescaped(value) => {
                    token.value = value;
                    changed = true;
                }
                TokenOutcome::Rewritten {
                    value,
                    record,
                } => {
                    token.value = value;
                    outcome.assets.push(record);
                    changed = true;
                }
                TokenOutcome::Failed(message) => outcome.warnings.push(message),
            }
        }

        if changed {
            outcome.value = Some(parsed.serialize());
        }
        outcome
    }

    /// Classifies and, for normal references, copies one argument.
    pub async fn process_token(
        &self,
        prop: &str,
        declaration_dir: Option<&Path>,
        raw_value: &str,
        result: &ProcessResult,
    ) -> TokenOutcome {
        match classify(raw_value) {
            UrlKind::Escaped(rest) => TokenOutcome::Unescaped(rest.to_string()),
            UrlKind::AbsoluteOrSpecial => TokenOutcome::Untouched,
            UrlKind::Normal => {
                match self.copy_asset(prop, declaration_dir, raw_value, result).await {
                    Ok((value, record)) => TokenOutcome::Rewritten {
                        value,
                        record,
                    },
                    Err(error) => {
                        debug!("Leaving '{}' untouched: {}", raw_value, error);
                        TokenOutcome::Failed(error.to_string())
                    }
                }
            }
        }
    }

    async fn copy_asset(
        &self,
        prop: &str,
        declaration_dir: Option<&Path>,
        raw_value: &str,
        result: &ProcessResult,
    ) -> Result<(String, AssetRecord), AssetError> {
        let declaration_dir = declaration_dir.ok_or_else(|| AssetError::MissingInputPath {
            prop: prop.to_string(),
        })?;

        let metadata = self.resolver.resolve(declaration_dir, raw_value).await?;
        let destination: PathBuf = self.planner.plan(&metadata)?;
        let metadata = self.copier.copy(metadata, destination.clone()).await?;

        let value = self.rewriter.rewrite(declaration_dir, &metadata, &destination, result);
        let record = AssetRecord {
            source: metadata.absolute_path.clone(),
            destination,
            written: !metadata.already_exists,
        };
        Ok((value, record))
    }
}
