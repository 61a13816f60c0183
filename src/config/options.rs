//! Programmatic options and their validated form.
//!
//! [`CopyOptions`] is what callers build. It accepts every shape the options
//! come in (one or many sources, glob or predicate ignore rules, pattern or
//! function templates). [`CopyOptions::resolve`] validates it and reduces each
//! option to one canonical form, producing [`ResolvedOptions`], which is all
//! the pipeline stages ever look at.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset::hash::default_hash_function;
use crate::asset::{
    AssetMetadata, CollisionPolicy, HashFunction, RelativePathFn, Template, TemplateFn,
    TransformFn,
};
use crate::constants::DEFAULT_TEMPLATE;
use crate::core::ConfigError;
use crate::pattern::{IgnoreFn, IgnoreMatcher};
use crate::stylesheet::{Declaration, ProcessResult};
use crate::utils::normalize_path;

/// Maps a declaration to the directory its references are relative to.
///
/// `None` means the declaration has no originating file.
pub type InputPathFn = Arc<dyn Fn(&Declaration) -> Option<PathBuf> + Send + Sync>;

/// The `ignore` option in any of its accepted shapes.
#[derive(Clone, Default)]
pub enum IgnoreOption {
    #[default]
    None,
    Patterns(Vec<String>),
    Predicate(IgnoreFn),
}

impl fmt::Debug for IgnoreOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Patterns(patterns) => f.debug_tuple("Patterns").field(patterns).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for IgnoreOption {
    fn from(pattern: &str) -> Self {
        Self::Patterns(vec![pattern.to_string()])
    }
}

impl From<String> for IgnoreOption {
    fn from(pattern: String) -> Self {
        Self::Patterns(vec![pattern])
    }
}

impl From<Vec<String>> for IgnoreOption {
    fn from(patterns: Vec<String>) -> Self {
        Self::Patterns(patterns)
    }
}

impl From<Vec<&str>> for IgnoreOption {
    fn from(patterns: Vec<&str>) -> Self {
        Self::Patterns(patterns.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for IgnoreOption {
    fn from(patterns: [&str; N]) -> Self {
        Self::Patterns(patterns.iter().map(|p| (*p).to_string()).collect())
    }
}

/// Builder for the pipeline options.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::config::CopyOptions;
///
/// let options = CopyOptions::new()
///     .src("src")
///     .dest("dist")
///     .template("[path]/[name]-[hash].[ext]")
///     .ignore(["*.svg", "fonts/**"]);
/// ```
#[derive(Clone)]
pub struct CopyOptions {
    sources: Vec<PathBuf>,
    dest: Option<PathBuf>,
    template: Template,
    relative_path: Option<RelativePathFn>,
    hash_function: Option<HashFunction>,
    transform: Option<TransformFn>,
    input_path: Option<InputPathFn>,
    ignore: IgnoreOption,
    placeholder_defaults: HashMap<String, String>,
    collision: CollisionPolicy,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            dest: None,
            template: Template::Pattern(DEFAULT_TEMPLATE.to_string()),
            relative_path: None,
            hash_function: None,
            transform: None,
            input_path: None,
            ignore: IgnoreOption::None,
            placeholder_defaults: HashMap::new(),
            collision: CollisionPolicy::default(),
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("sources", &self.sources)
            .field("dest", &self.dest)
            .field("template", &self.template)
            .field("relative_path", &self.relative_path.is_some())
            .field("hash_function", &self.hash_function.is_some())
            .field("transform", &self.transform.is_some())
            .field("input_path", &self.input_path.is_some())
            .field("ignore", &self.ignore)
            .field("placeholder_defaults", &self.placeholder_defaults)
            .field("collision", &self.collision)
            .finish()
    }
}

impl CopyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single source root, replacing any previous ones.
    #[must_use]
    pub fn src(mut self, src: impl AsRef<Path>) -> Self {
        self.sources = vec![src.as_ref().to_path_buf()];
        self
    }

    /// Sets several source roots. Earlier roots take precedence.
    #[must_use]
    pub fn sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.sources = sources.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        self
    }

    #[must_use]
    pub fn dest(mut self, dest: impl AsRef<Path>) -> Self {
        self.dest = Some(dest.as_ref().to_path_buf());
        self
    }

    /// Uses a placeholder pattern such as `assets/[hash].[ext]`.
    #[must_use]
    pub fn template(mut self, pattern: impl Into<String>) -> Self {
        self.template = Template::Pattern(pattern.into());
        self
    }

    /// Computes destinations (relative to `dest`) with a function.
    #[must_use]
    pub fn template_fn<F>(mut self, template: F) -> Self
    where
        F: Fn(&AssetMetadata) -> PathBuf + Send + Sync + 'static,
    {
        self.template = Template::Custom(Arc::new(template));
        self
    }

    /// Overrides the directory rewritten references are relative to.
    #[must_use]
    pub fn relative_path<F>(mut self, relative_path: F) -> Self
    where
        F: Fn(&Path, &AssetMetadata, &ProcessResult, &ResolvedOptions) -> PathBuf
            + Send
            + Sync
            + 'static,
    {
        self.relative_path = Some(Arc::new(relative_path));
        self
    }

    #[must_use]
    pub fn hash_function<F>(mut self, hash_function: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        self.hash_function = Some(Arc::new(hash_function));
        self
    }

    /// Sets an async content transform, applied before new files are written.
    #[must_use]
    pub fn transform<F, Fut>(mut self, transform: F) -> Self
    where
        F: Fn(AssetMetadata) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<AssetMetadata>> + Send + 'static,
    {
        self.transform = Some(Arc::new(
            move |metadata: AssetMetadata| -> BoxFuture<'static, anyhow::Result<AssetMetadata>> {
                transform(metadata).boxed()
            },
        ));
        self
    }

    /// Overrides how a declaration's base directory is found.
    #[must_use]
    pub fn input_path<F>(mut self, input_path: F) -> Self
    where
        F: Fn(&Declaration) -> Option<PathBuf> + Send + Sync + 'static,
    {
        self.input_path = Some(Arc::new(input_path));
        self
    }

    /// Skips references matching one glob or a list of globs.
    #[must_use]
    pub fn ignore(mut self, ignore: impl Into<IgnoreOption>) -> Self {
        self.ignore = ignore.into();
        self
    }

    /// Skips references for which `predicate(filename, url_suffix)` is true.
    #[must_use]
    pub fn ignore_fn<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.ignore = IgnoreOption::Predicate(Arc::new(predicate));
        self
    }

    /// Fallback for placeholder `name` (`path`, `name`, `hash` or `ext`) when
    /// the asset's own value is empty.
    #[must_use]
    pub fn placeholder_default(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.placeholder_defaults.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Validates the options and normalizes them.
    ///
    /// Relative roots are made absolute against the current working
    /// directory, which is also captured for resolving relative declaration
    /// directories later on.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingSource`] / [`ConfigError::MissingDestination`]
    ///   when a root is absent or empty
    /// - [`ConfigError::InvalidIgnorePattern`] for a malformed glob
    /// - [`ConfigError::WorkingDirectory`] when the working directory is unavailable
    pub fn resolve(&self) -> Result<ResolvedOptions, ConfigError> {
        let sources: Vec<&PathBuf> =
            self.sources.iter().filter(|src| !src.as_os_str().is_empty()).collect();
        if sources.is_empty() {
            return Err(ConfigError::MissingSource);
        }
        let dest = self
            .dest
            .as_ref()
            .filter(|dest| !dest.as_os_str().is_empty())
            .ok_or(ConfigError::MissingDestination)?;

        let working_dir = std::env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            path: PathBuf::from("."),
            source,
        })?;

        let ignore = match &self.ignore {
            IgnoreOption::None => IgnoreMatcher::Never,
            IgnoreOption::Patterns(patterns) => IgnoreMatcher::from_patterns(patterns)?,
            IgnoreOption::Predicate(predicate) => IgnoreMatcher::Predicate(Arc::clone(predicate)),
        };

        Ok(ResolvedOptions {
            sources: sources
                .into_iter()
                .map(|src| normalize_path(&working_dir.join(src)))
                .collect(),
            dest: normalize_path(&working_dir.join(dest)),
            template: self.template.clone().into_fn(&self.placeholder_defaults),
            relative_path: self.relative_path.clone(),
            hash_function: self.hash_function.clone().unwrap_or_else(default_hash_function),
            transform: self.transform.clone(),
            input_path: self.input_path.clone().unwrap_or_else(default_input_path),
            ignore,
            collision: self.collision,
            working_dir,
        })
    }
}

fn default_input_path() -> InputPathFn {
    Arc::new(|declaration: &Declaration| {
        declaration.input_file().and_then(Path::parent).map(Path::to_path_buf)
    })
}

/// Validated options in canonical form.
#[derive(Clone)]
pub struct ResolvedOptions {
    /// Absolute, normalized source roots in precedence order
    pub sources: Vec<PathBuf>,
    /// Absolute, normalized destination root
    pub dest: PathBuf,
    /// Working directory captured at resolution time
    pub working_dir: PathBuf,
    pub template: TemplateFn,
    pub relative_path: Option<RelativePathFn>,
    pub hash_function: HashFunction,
    pub transform: Option<TransformFn>,
    pub input_path: InputPathFn,
    pub ignore: IgnoreMatcher,
    pub collision: CollisionPolicy,
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("sources", &self.sources)
            .field("dest", &self.dest)
            .field("working_dir", &self.working_dir)
            .field("relative_path", &self.relative_path.is_some())
            .field("transform", &self.transform.is_some())
            .field("ignore", &self.ignore)
            .field("collision", &self.collision)
            .finish_non_exhaustive()
    }
}
