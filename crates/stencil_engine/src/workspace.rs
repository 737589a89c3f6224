//! The filesystem root for one run.
//!
//! A workspace lists, reads, writes, deletes, and moves paths relative to
//! its root. Listings are sorted so every pass visits files in the same
//! order on every run.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::EngineResult;

/// Filesystem root the engine reads from and writes into.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn absolute(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// All files under the root, as sorted relative paths.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(&self.root).ok().map(PathBuf::from))
            .collect();
        files.sort();
        files
    }

    /// All entries (files and directories), sorted, deepest first.
    /// The order lets a rename pass touch children before their parents.
    pub fn entries_deepest_first(&self) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.path().strip_prefix(&self.root).ok().map(PathBuf::from))
            .collect();
        entries.sort_by(|a, b| {
            let depth = |p: &PathBuf| p.components().count();
            depth(b).cmp(&depth(a)).then_with(|| a.cmp(b))
        });
        entries
    }

    /// Read a file as text; `None` when the content is binary.
    pub fn read_text(&self, relative: &Path) -> EngineResult<Option<String>> {
        let bytes = fs::read(self.absolute(relative))?;
        if bytes.contains(&0) {
            return Ok(None);
        }
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(_) => Ok(None),
        }
    }

    pub fn write_text(&self, relative: &Path, content: &str) -> EngineResult<()> {
        let path = self.absolute(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Delete every path matching a workspace-relative glob pattern.
    /// Returns the deleted relative paths.
    pub fn delete_matching(&self, pattern: &str) -> EngineResult<Vec<PathBuf>> {
        let matcher = Pattern::new(pattern).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid glob '{}': {}", pattern, e),
            )
        })?;

        let mut deleted = Vec::new();
        for relative in self.entries_deepest_first() {
            if !matcher.matches_path(&relative) {
                continue;
            }
            let path = self.absolute(&relative);
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else if path.exists() {
                fs::remove_file(&path)?;
            } else {
                // Already gone with a deleted ancestor.
                continue;
            }
            debug!("Deleted {:?}", relative);
            deleted.push(relative);
        }

        // Directories emptied by the deletions go too, up the ancestor
        // chain, so a disabled feature leaves no bare directory behind.
        let parents: Vec<PathBuf> = deleted
            .iter()
            .filter_map(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .collect();
        for mut dir in parents {
            loop {
                let path = self.absolute(&dir);
                if !path.is_dir() || fs::read_dir(&path)?.next().is_some() {
                    break;
                }
                fs::remove_dir(&path)?;
                debug!("Removed emptied directory {:?}", dir);
                match dir.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => {
                        dir = parent.to_path_buf()
                    }
                    _ => break,
                }
            }
        }

        Ok(deleted)
    }

    /// Move a file or directory. Returns false when the source is absent,
    /// which keeps the operation idempotent.
    pub fn move_path(&self, from: &Path, to: &Path) -> EngineResult<bool> {
        let source = self.absolute(from);
        if !source.exists() {
            return Ok(false);
        }
        let target = self.absolute(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(source, target)?;
        debug!("Moved {:?} -> {:?}", from, to);
        Ok(true)
    }

    pub fn remove_file(&self, relative: &Path) -> EngineResult<bool> {
        let path = self.absolute(relative);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    /// Remove directories left empty by deletions, deepest first.
    pub fn prune_empty_dirs(&self) -> EngineResult<()> {
        for relative in self.entries_deepest_first() {
            let path = self.absolute(&relative);
            if path.is_dir() && fs::read_dir(&path)?.next().is_none() {
                fs::remove_dir(&path)?;
                debug!("Pruned empty directory {:?}", relative);
            }
        }
        Ok(())
    }
}
