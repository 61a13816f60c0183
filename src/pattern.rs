//! Ignore rules for referenced assets.
//!
//! The `ignore` option comes in three shapes (a single glob, a list of globs,
//! or a predicate). They are normalized once, when options are resolved, into
//! an [`IgnoreMatcher`]; the resolver only ever calls
//! [`IgnoreMatcher::should_ignore`].
//!
//! # Pattern Syntax
//!
//! Globs use the `glob` crate:
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components (recursive matching)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match a character set or range
//!
//! `*` never crosses a `/`, so `*.svg` matches `icon.svg` but not
//! `images/icon.svg`; use `**/*.svg` for the latter.
//!
//! # Match Target
//!
//! A pattern is matched against the reference *as written* (stripped of its
//! query/fragment) followed by that suffix, so `*.png?inline` can single out
//! one flavour of a reference:
//!
//! ```rust,no_run
//! use url_copy::pattern::IgnoreMatcher;
//!
//! # fn example() -> Result<(), url_copy::core::ConfigError> {
//! let matcher = IgnoreMatcher::from_patterns(&["*.png?inline".to_string()])?;
//! assert!(matcher.should_ignore("logo.png", "?inline"));
//! assert!(!matcher.should_ignore("logo.png", ""));
//! # Ok(())
//! # }
//! ```

use glob::{MatchOptions, Pattern};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::core::ConfigError;

/// Predicate form of the `ignore` option: `(filename, url_suffix) -> ignore?`
pub type IgnoreFn = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single compiled glob pattern.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidIgnorePattern`] for malformed globs such
    /// as an unclosed character class.
    pub fn new(pattern_str: &str) -> Result<Self, ConfigError> {
        let pattern =
            Pattern::new(pattern_str).map_err(|source| ConfigError::InvalidIgnorePattern {
                pattern: pattern_str.to_string(),
                source,
            })?;

        Ok(Self {
            pattern,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Checks a match target against the compiled pattern.
    #[must_use]
    pub fn matches(&self, target: &str) -> bool {
        self.pattern.matches_with(target, MATCH_OPTIONS)
    }

    /// Returns the pattern as it was written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}

/// Canonical form of the `ignore` option.
#[derive(Clone, Default)]
pub enum IgnoreMatcher {
    /// No ignore rules; nothing is skipped
    #[default]
    Never,
    /// Skip when any glob matches `filename + suffix`
    Patterns(Vec<PatternMatcher>),
    /// Skip when the user predicate returns `true`
    Predicate(IgnoreFn),
}

impl IgnoreMatcher {
    /// Compiles a list of globs. An empty list never ignores anything.
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn from_patterns(patterns: &[String]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Ok(Self::Never);
        }

        let compiled =
            patterns.iter().map(|p| PatternMatcher::new(p)).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Patterns(compiled))
    }

    /// Wraps a predicate.
    pub fn from_predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Decides whether a reference should be skipped.
    ///
    /// `filename` is the reference with its suffix removed, `url_suffix` the
    /// removed `?query` / `#fragment` (possibly empty).
    #[must_use]
    pub fn should_ignore(&self, filename: &str, url_suffix: &str) -> bool {
        match self {
            Self::Never => false,
            Self::Predicate(predicate) => predicate(filename, url_suffix),
            Self::Patterns(patterns) => {
                let target = format!("{filename}{url_suffix}");
                patterns.iter().any(|p| {
                    let hit = p.matches(&target);
                    trace!("ignore pattern '{}' vs '{}': {}", p.pattern(), target, hit);
                    hit
                })
            }
        }
    }
}

impl fmt::Debug for IgnoreMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::Patterns(patterns) => f
                .debug_tuple("Patterns")
                .field(&patterns.iter().map(PatternMatcher::pattern).collect::<Vec<_>>())
                .finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
