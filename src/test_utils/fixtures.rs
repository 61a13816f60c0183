//! Temporary project layouts for pipeline tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::CopyOptions;
use crate::stylesheet::{Declaration, SourceLocation};

/// A temporary project with `src/` (the source root) and `dist/` (the
/// destination root, not created until something is copied).
#[derive(Debug)]
pub struct AssetFixture {
    temp_dir: TempDir,
}

impl AssetFixture {
    /// Creates the temporary directory and an empty `src/`.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        fs::create_dir_all(temp_dir.path().join("src")).context("Failed to create src dir")?;
        Ok(Self {
            temp_dir,
        })
    }

    /// Directory containing `src/` and `dist/`.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn src(&self) -> PathBuf {
        self.root().join("src")
    }

    pub fn dest(&self) -> PathBuf {
        self.root().join("dist")
    }

    /// Writes `contents` to `src/<relative>`, creating parent directories.
    pub fn add_file(&self, relative: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.src().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// A declaration parsed from the stylesheet at `src/<stylesheet>`.
    ///
    /// The stylesheet file itself does not need to exist.
    pub fn declaration(&self, stylesheet: &str, prop: &str, value: &str) -> Declaration {
        Declaration::new(prop, value)
            .with_source(SourceLocation::new(self.src().join(stylesheet), 1, 1))
    }

    /// Options with `src` and `dest` pointing into the fixture.
    pub fn options(&self) -> CopyOptions {
        CopyOptions::new().src(self.src()).dest(self.dest())
    }

    /// Reads `dist/<relative>`.
    pub fn read_dest(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.dest().join(relative);
        fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// All files under `dist/`, relative to it, sorted.
    pub fn dest_files(&self) -> Result<Vec<PathBuf>> {
        let dest = self.dest();
        let mut files = Vec::new();
        if dest.exists() {
            collect_files(&dest, &dest, &mut files)?;
        }
        files.sort();
        Ok(files)
    }
}

fn collect_files(base: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(base, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(())
}
