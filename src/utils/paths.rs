//! Path utilities for normalization, containment checks and relative paths.
//!
//! Everything here is lexical: no function touches the filesystem, resolves
//! symlinks, or requires the path to exist. That keeps resolution of a
//! `url()` reference deterministic and cheap, and lets the pipeline decide
//! about source roots before performing any I/O.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path by resolving `.` and `..` components.
///
/// This function cleans up path components by:
/// - Removing `.` (current directory) components
/// - Resolving `..` (parent directory) components
/// - Maintaining the path's absolute or relative nature
///
/// `..` at the root of an absolute path stays at the root, like
/// `path.resolve` does in most runtimes.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::utils::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// let path = Path::new("/foo/./bar/../baz");
/// assert_eq!(normalize_path(path), PathBuf::from("/foo/baz"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {} // Skip .
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Checks whether `path` stays inside `base` after normalization.
///
/// Both paths are normalized before the component-wise prefix comparison, so
/// `..` traversal is detected and `/srcfoo` is never considered inside `/src`.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::utils::is_within;
/// use std::path::Path;
///
/// let base = Path::new("/project/dist");
/// assert!(is_within(base, Path::new("/project/dist/assets/a.png")));
/// assert!(!is_within(base, Path::new("/project/dist/../secret.png")));
/// ```
#[must_use]
pub fn is_within(base: &Path, path: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(base))
}

/// Computes the path that leads from directory `from` to `to`.
///
/// Both inputs are expected to be absolute; they are normalized first. The
/// result is empty when both point at the same location.
///
/// # Examples
///
/// ```rust,no_run
/// use url_copy::utils::relative_path;
/// use std::path::{Path, PathBuf};
///
/// let rel = relative_path(Path::new("/out/css"), Path::new("/out/assets/a.png"));
/// assert_eq!(rel, PathBuf::from("../assets/a.png"));
/// ```
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize_path(from);
    let to = normalize_path(to);

    let from_components: Vec<_> = from.components().collect();
    let to_components: Vec<_> = to.components().collect();

    let common =
        from_components.iter().zip(&to_components).take_while(|(a, b)| a == b).count();

    let mut result = PathBuf::new();
    for _ in common..from_components.len() {
        result.push("..");
    }
    for component in &to_components[common..] {
        result.push(component.as_os_str());
    }
    result
}

/// Converts a path to a URL-friendly string with forward slashes.
///
/// Windows separators are replaced regardless of host, so rewritten
/// references are identical on every platform.
#[must_use]
pub fn to_url_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}
