//! Locating `url()` arguments inside a declaration value.
//!
//! This is not a CSS parser. The scanner only needs to find every `url(`
//! function call (top level or nested inside other functions such as
//! `image-set()`), know where its argument starts and ends, and leave the rest
//! of the value alone. Serializing a [`ParsedValue`] reproduces the input byte
//! for byte except for the arguments whose value was changed.
//!
//! Quoted strings and comments outside of `url()` are skipped, so
//! `content: "url(x)"` is never mistaken for a reference. Only the lowercase
//! function name `url` is recognized, and only when it is not the tail of a
//! longer identifier.

use std::fmt;
use std::ops::Range;
use tracing::trace;

/// One `url()` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlToken {
    /// Argument text without quotes; assign to rewrite the reference
    pub value: String,
    /// Quote character the argument was written with, if any
    pub quote: Option<char>,
    span: Range<usize>,
}

impl UrlToken {
    /// Byte range of the original argument inside the declaration value.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// A declaration value split around its `url()` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedValue {
    source: String,
    tokens: Vec<UrlToken>,
}

impl ParsedValue {
    /// Scans `value` for `url()` arguments.
    ///
    /// Calls without an argument (`url()`, `url("")`) yield no token.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use url_copy::stylesheet::ParsedValue;
    ///
    /// let mut parsed = ParsedValue::parse(r#"url("a.png") no-repeat, url(b.svg)"#);
    /// assert_eq!(parsed.tokens().len(), 2);
    ///
    /// parsed.tokens_mut()[1].value = "assets/b.svg".to_string();
    /// assert_eq!(parsed.serialize(), r#"url("a.png") no-repeat, url(assets/b.svg)"#);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let bytes = value.as_bytes();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => i = skip_string(bytes, i),
                b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i),
                b'\\' => i += 2,
                b'u' if bytes[i..].starts_with(b"url(") && !preceded_by_ident(bytes, i) => {
                    let (token, next) = parse_argument(value, i + 4);
                    if let Some(token) = token {
                        trace!("Found url() argument '{}' at {:?}", token.value, token.span);
                        tokens.push(token);
                    }
                    i = next;
                }
                _ => i += 1,
            }
        }

        Self {
            source: value.to_string(),
            tokens,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[UrlToken] {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut [UrlToken] {
        &mut self.tokens
    }

    /// The value as it was before any token was modified.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Rebuilds the value with the current token values.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut last = 0;
        for token in &self.tokens {
            out.push_str(&self.source[last..token.span.start]);
            out.push_str(&token.value);
            last = token.span.end;
        }
        out.push_str(&self.source[last..]);
        out
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn preceded_by_ident(bytes: &[u8], index: usize) -> bool {
    index
        .checked_sub(1)
        .and_then(|prev| bytes.get(prev))
        .is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80)
}

/// Returns the index just past the closing quote, or the end of input.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    find_closing_quote(bytes, start).map_or(bytes.len(), |close| close + 1)
}

fn find_closing_quote(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .windows(2)
        .position(|pair| pair == b"*/")
        .map_or(bytes.len(), |offset| start + 2 + offset + 2)
}

/// Finds the `)` closing a url call, honouring backslash escapes.
fn find_close_paren(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b')' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/// Parses the argument of a `url(` call whose argument starts at `start`.
///
/// Returns the token (if the call has a non-empty argument) and the index to
/// resume scanning from.
fn parse_argument(value: &str, start: usize) -> (Option<UrlToken>, usize) {
    let bytes = value.as_bytes();
    let mut j = start;
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    if j >= bytes.len() {
        return (None, bytes.len());
    }

    if matches!(bytes[j], b'"' | b'\'') {
        let Some(close) = find_closing_quote(bytes, j) else {
            return (None, bytes.len());
        };
        let next = find_close_paren(bytes, close + 1).map_or(bytes.len(), |paren| paren + 1);
        let span = j + 1..close;
        if span.is_empty() {
            return (None, next);
        }
        let token = UrlToken {
            value: value[span.clone()].to_string(),
            quote: Some(char::from(bytes[j])),
            span,
        };
        return (Some(token), next);
    }

    let close = find_close_paren(bytes, j);
    let mut end = close.unwrap_or(bytes.len());
    while end > j && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let next = close.map_or(bytes.len(), |paren| paren + 1);
    if end == j {
        return (None, next);
    }

    let token = UrlToken {
        value: value[j..end].to_string(),
        quote: None,
        span: j..end,
    };
    (Some(token), next)
}
