//! Destination planning.
//!
//! The `template` option is either a pattern string with placeholders or a
//! custom function. Both are reduced at configuration time to one canonical
//! [`TemplateFn`]; the planner only calls it and anchors the result under the
//! destination root.
//!
//! # Placeholders
//!
//! | placeholder | value |
//! |---|---|
//! | `[path]` | directory of the asset relative to its source root |
//! | `[name]` | file name without extension |
//! | `[hash]` | content hash |
//! | `[ext]`  | lower-cased extension without the dot |
//!
//! Every occurrence of a placeholder is replaced. When the metadata value is
//! empty (a file directly in the source root has an empty `[path]`, a file
//! without extension an empty `[ext]`), the placeholder default from the
//! options is used instead, or nothing if none is configured. Bracketed text
//! that is not one of the four names is kept literally.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::asset::AssetMetadata;
use crate::core::AssetError;
use crate::utils::{is_within, normalize_path, to_url_path};

/// Canonical template: maps metadata to a path relative to the destination root.
pub type TemplateFn = Arc<dyn Fn(&AssetMetadata) -> PathBuf + Send + Sync>;

/// The `template` option as supplied by the user.
#[derive(Clone)]
pub enum Template {
    /// Pattern with `[path]`, `[name]`, `[hash]` and `[ext]` placeholders
    Pattern(String),
    /// Arbitrary function returning the destination relative to `dest`
    Custom(TemplateFn),
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Template {
    /// Reduces the option to its canonical callable form.
    pub fn into_fn(self, defaults: &HashMap<String, String>) -> TemplateFn {
        match self {
            Self::Custom(function) => function,
            Self::Pattern(pattern) => {
                let compiled = CompiledTemplate::compile(&pattern, defaults);
                Arc::new(move |metadata: &AssetMetadata| PathBuf::from(compiled.render(metadata)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Path,
    Name,
    Hash,
    Ext,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "path" => Some(Self::Path),
            "name" => Some(Self::Name),
            "hash" => Some(Self::Hash),
            "ext" => Some(Self::Ext),
            _ => None,
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Name => "name",
            Self::Hash => "hash",
            Self::Ext => "ext",
        }
    }

    fn value(self, metadata: &AssetMetadata) -> String {
        match self {
            Self::Path => to_url_path(&metadata.relative_dir),
            Self::Name => metadata.base_name.clone(),
            Self::Hash => metadata.content_hash.clone(),
            Self::Ext => metadata.extension.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        placeholder: Placeholder,
        fallback: String,
    },
}

/// A pattern template split into literal text and placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    /// Compiles `pattern`, capturing placeholder defaults by name.
    #[must_use]
    pub fn compile(pattern: &str, defaults: &HashMap<String, String>) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('[') {
            let after_open = &rest[open + 1..];
            let placeholder = after_open
                .find(']')
                .and_then(|close| Placeholder::parse(&after_open[..close]).map(|p| (p, close)));

            match placeholder {
                Some((placeholder, close)) => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder {
                        placeholder,
                        fallback: defaults.get(placeholder.key()).cloned().unwrap_or_default(),
                    });
                    rest = &after_open[close + 1..];
                }
                None => {
                    literal.push_str(&rest[..=open]);
                    rest = after_open;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            segments,
        }
    }

    /// Substitutes metadata into the template.
    #[must_use]
    pub fn render(&self, metadata: &AssetMetadata) -> String {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder {
                    placeholder,
                    fallback,
                } => {
                    let value = placeholder.value(metadata);
                    if value.is_empty() {
                        rendered.push_str(fallback);
                    } else {
                        rendered.push_str(&value);
                    }
                }
            }
        }
        rendered
    }
}

/// Computes absolute destination paths under the destination root.
pub struct DestinationPlanner<'a> {
    dest: &'a Path,
    template: &'a TemplateFn,
}

impl<'a> DestinationPlanner<'a> {
    /// Creates a planner for `dest` (absolute, normalized) and a canonical template.
    #[must_use]
    pub const fn new(dest: &'a Path, template: &'a TemplateFn) -> Self {
        Self {
            dest,
            template,
        }
    }

    /// Returns the absolute destination for `metadata`.
    ///
    /// Leading separators in the rendered template are dropped, so `/a.png`
    /// and `a.png` both land directly under the root.
    ///
    /// # Errors
    ///
    /// [`AssetError::DestinationOutsideRoot`] when the rendered path climbs out
    /// of the destination root with `..` or resolves to the root itself.
    pub fn plan(&self, metadata: &AssetMetadata) -> Result<PathBuf, AssetError> {
        let rendered = (self.template)(metadata);

        let relative: PathBuf = rendered
            .components()
            .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
            .collect();
        let destination = normalize_path(&self.dest.join(relative));

        if destination == self.dest || !is_within(self.dest, &destination) {
            return Err(AssetError::DestinationOutsideRoot {
                path: destination,
            });
        }

        debug!("Planned {} -> {}", metadata.absolute_path.display(), destination.display());
        Ok(destination)
    }
}
