//! Structured file system error handling for url-copy
//!
//! File operations capture their context at the operation site (what was
//! being done, to which path, why, and by whom) instead of relying on the bare
//! `std::io::Error` text.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Detailed file operation context for better error messages
#[derive(Debug, Clone)]
pub struct FileOperationContext {
    /// The type of operation being performed
    pub operation: FileOperation,
    /// The file path being accessed
    pub file_path: PathBuf,
    /// Additional context about why the file is being accessed
    pub purpose: String,
    /// The component that initiated the operation
    pub caller: String,
}

/// Types of file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing a file
    Write,
    /// Checking if a file exists
    Exists,
    /// Creating a directory
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Exists => write!(f, "checking if file exists"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

impl FileOperationContext {
    /// Create a new file operation context
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
        }
    }
}

/// File operation error with full context
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", .file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// What code initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Create a new file operation error from context and IO error
    pub fn new(context: FileOperationContext, source: std::io::Error) -> Self {
        Self {
            operation: context.operation,
            file_path: context.file_path,
            purpose: context.purpose,
            caller: context.caller,
            source,
        }
    }
}

/// Extension trait for Result types to add file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|io_error| {
            let context = FileOperationContext::new(operation, file_path, purpose, caller);
            FileOperationError::new(context, io_error)
        })
    }
}

/// Convenience functions for the file operations the pipeline performs
pub struct FileOps;

impl FileOps {
    /// Read a file's bytes with full context
    pub async fn read_bytes_with_context(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<Vec<u8>, FileOperationError> {
        tokio::fs::read(path).await.with_file_context(FileOperation::Read, path, purpose, caller)
    }

    /// Check if a file exists with context
    pub async fn exists_with_context(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<bool, FileOperationError> {
        tokio::fs::metadata(path)
            .await
            .map(|_| true)
            .or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Ok(false)
                } else {
                    Err(e)
                }
            })
            .with_file_context(FileOperation::Exists, path, purpose, caller)
    }

    /// Create a directory and all of its parents with context
    pub async fn create_dir_all_with_context(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<(), FileOperationError> {
        tokio::fs::create_dir_all(path).await.with_file_context(
            FileOperation::CreateDir,
            path,
            purpose,
            caller,
        )
    }

    /// Write `content` to `path` only if nothing exists there yet.
    ///
    /// The bytes go to a temporary file in the same directory, which is then
    /// moved into place without replacing anything. `path` therefore either
    /// holds the complete content or does not exist. Returns `Ok(false)`
    /// when another writer got there first.
    pub async fn write_new_with_context(
        path: &Path,
        content: &[u8],
        purpose: &str,
        caller: &str,
    ) -> Result<bool, FileOperationError> {
        let target = path.to_path_buf();
        let content = content.to_vec();

        tokio::task::spawn_blocking(move || persist_new(&target, |file| file.write_all(&content)))
            .await
            .map_err(std::io::Error::other)
            .and_then(|written| written)
            .with_file_context(FileOperation::Write, path, purpose, caller)
    }
}

/// Fills a temporary sibling of `path` and links it into place unless `path`
/// exists. The temporary file is removed on every failure.
fn persist_new<F>(path: &Path, fill: F) -> std::io::Result<bool>
where
    F: FnOnce(&mut std::fs::File) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    fill(temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    match temp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error),
    }
}
