//! Input and output contract with the host stylesheet pipeline.
//!
//! The host parses stylesheets itself and hands over flat lists of
//! [`Declaration`]s. Values are rewritten in place; everything the run wants
//! to report ends up in a [`ProcessResult`].
//!
//! # Modules
//!
//! - [`value`] - locating `url()` arguments inside a declaration value
//! - [`result`] - warnings, copied asset records and output location

pub mod result;
pub mod value;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use result::{AssetRecord, ProcessResult, Warning};
pub use value::{ParsedValue, UrlToken};

/// Where a declaration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Stylesheet file the declaration was parsed from, if any
    pub input_file: Option<PathBuf>,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl SourceLocation {
    /// Location inside `input_file`.
    pub fn new(input_file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            input_file: Some(input_file.into()),
            line,
            column,
        }
    }
}

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            source: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = Some(source);
        self
    }

    /// The stylesheet file this declaration was parsed from.
    #[must_use]
    pub fn input_file(&self) -> Option<&Path> {
        self.source.as_ref().and_then(|source| source.input_file.as_deref())
    }
}

/// All declarations of one stylesheet, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    pub declarations: Vec<Declaration>,
}

impl Stylesheet {
    #[must_use]
    pub const fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
        }
    }

    /// Builds a stylesheet whose declarations all come from `input_file`.
    ///
    /// Locations only carry the file; line and column are left at zero.
    pub fn from_file<I>(input_file: impl AsRef<Path>, declarations: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let input_file = input_file.as_ref();
        let declarations = declarations
            .into_iter()
            .map(|(prop, value)| {
                Declaration::new(prop, value).with_source(SourceLocation::new(input_file, 0, 0))
            })
            .collect();
        Self::new(declarations)
    }

    /// Looks up the first declaration of `prop`.
    #[must_use]
    pub fn get(&self, prop: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.prop == prop)
    }
}
