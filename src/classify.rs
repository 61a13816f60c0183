//! Classification of raw `url()` arguments.
//!
//! Before any resolution happens, each token is sorted into one of three
//! buckets:
//!
//! - **Escaped** - the token starts with `!`. The `!` is dropped and the rest
//!   becomes the final value verbatim. This is the opt-out escape hatch.
//! - **Absolute or special** - root-relative paths (`/`), data URIs (`data:`),
//!   fragment-only references (`#`) and anything with a `scheme://` prefix.
//!   These are left completely untouched.
//! - **Normal** - everything else goes through the copy pipeline.

use regex::Regex;
use std::sync::LazyLock;

static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+://").expect("scheme pattern is valid"));

/// How a raw `url()` argument should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind<'a> {
    /// Leading `!` stripped; the contained value is emitted as is
    Escaped(&'a str),
    /// Absolute path, data URI, fragment or `scheme://` URL; left untouched
    AbsoluteOrSpecial,
    /// A relative reference to resolve and copy
    Normal,
}

/// Classifies a raw `url()` argument. Pure, performs no I/O.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::classify::{classify, UrlKind};
///
/// assert_eq!(classify("!keep/me.png"), UrlKind::Escaped("keep/me.png"));
/// assert_eq!(classify("https://cdn.example/a.png"), UrlKind::AbsoluteOrSpecial);
/// assert_eq!(classify("img/a.png"), UrlKind::Normal);
/// ```
#[must_use]
pub fn classify(raw: &str) -> UrlKind<'_> {
    if let Some(rest) = raw.strip_prefix('!') {
        return UrlKind::Escaped(rest);
    }

    if raw.starts_with('/')
        || raw.starts_with("data:")
        || raw.starts_with('#')
        || SCHEME_PATTERN.is_match(raw)
    {
        return UrlKind::AbsoluteOrSpecial;
    }

    UrlKind::Normal
}
