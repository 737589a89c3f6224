//! Dependency manifest merging.
//!
//! Manifests are JSON documents (insertion order preserved). Handlers queue
//! structured changes against a shared in-memory document per file; each
//! document is serialized at most once at end-of-run, and only when a
//! change actually altered it. Untouched keys keep their order and value.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::workspace::Workspace;

/// One structured edit against a manifest document.
#[derive(Debug, Clone)]
pub enum ChangeOp {
    /// Upsert the value at the path, creating intermediate objects.
    Set(Value),
    /// Delete the entry at the path; absent entries are a no-op.
    Remove,
}

#[derive(Debug, Clone)]
pub struct Change {
    /// Dot-separated object path, e.g. `require.drupal/search_api_solr`.
    pub path: String,
    pub op: ChangeOp,
}

/// An in-memory manifest document.
pub struct ManifestDocument {
    path: PathBuf,
    root: Value,
    dirty: bool,
}

impl ManifestDocument {
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let root: Value = serde_json::from_str(&content).map_err(|e| EngineError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if !root.is_object() {
            return Err(EngineError::Manifest {
                path: path.to_path_buf(),
                message: "manifest root must be an object".to_string(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            root,
            dirty: false,
        })
    }

    /// Apply one change. Marks the document dirty only when the content
    /// actually changed, so remove-of-absent and set-to-same-value keep
    /// the on-disk bytes untouched.
    pub fn apply(&mut self, change: &Change) -> EngineResult<()> {
        let segments: Vec<&str> = change.path.split('.').collect();
        match &change.op {
            ChangeOp::Set(value) => {
                let slot = self.navigate_creating(&segments)?;
                if slot != value {
                    *slot = value.clone();
                    self.dirty = true;
                }
            }
            ChangeOp::Remove => {
                if self.remove_at(&segments)? {
                    self.dirty = true;
                }
            }
        }
        Ok(())
    }

    fn navigate_creating(&mut self, segments: &[&str]) -> EngineResult<&mut Value> {
        let path = self.path.clone();
        let mut current = &mut self.root;
        let Some((last, parents)) = segments.split_last() else {
            return Err(EngineError::Manifest {
                path,
                message: "empty manifest path".to_string(),
            });
        };

        for segment in parents {
            let object = current.as_object_mut().ok_or_else(|| EngineError::Manifest {
                path: path.clone(),
                message: format!("'{}' is not an object", segment),
            })?;
            current = object
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }

        let object = current.as_object_mut().ok_or_else(|| EngineError::Manifest {
            path: path.clone(),
            message: format!("parent of '{}' is not an object", last),
        })?;
        Ok(object
            .entry(last.to_string())
            .or_insert(Value::Null))
    }

    /// Remove the entry; returns whether anything was removed.
    fn remove_at(&mut self, segments: &[&str]) -> EngineResult<bool> {
        let path = self.path.clone();
        let mut current = &mut self.root;
        let Some((last, parents)) = segments.split_last() else {
            return Err(EngineError::Manifest {
                path,
                message: "empty manifest path".to_string(),
            });
        };

        for segment in parents {
            let object = current.as_object_mut().ok_or_else(|| EngineError::Manifest {
                path: path.clone(),
                message: format!("'{}' is not an object", segment),
            })?;
            match object.get_mut(*segment) {
                Some(next) => current = next,
                None => return Ok(false),
            }
        }

        let object = current.as_object_mut().ok_or_else(|| EngineError::Manifest {
            path: path.clone(),
            message: format!("parent of '{}' is not an object", last),
        })?;
        Ok(object.shift_remove(*last).is_some())
    }

    /// Serialize back to disk if any change altered the document.
    pub fn flush(&self) -> EngineResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let mut serialized =
            serde_json::to_string_pretty(&self.root).map_err(|e| EngineError::Manifest {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        serialized.push('\n');
        fs::write(&self.path, serialized)?;
        info!("Wrote manifest {:?}", self.path);
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

/// All manifest documents touched during one run, keyed by relative path.
/// Documents load lazily on first change and flush exactly once.
#[derive(Default)]
pub struct ManifestSet {
    root: PathBuf,
    docs: BTreeMap<PathBuf, ManifestDocument>,
}

impl ManifestSet {
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            root: workspace.root().to_path_buf(),
            docs: BTreeMap::new(),
        }
    }

    /// Queue a change against a manifest, loading it on first touch.
    pub fn queue(&mut self, file: &str, change: Change) -> EngineResult<()> {
        let doc = match self.docs.entry(PathBuf::from(file)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let doc = ManifestDocument::load(&self.root.join(entry.key()))?;
                entry.insert(doc)
            }
        };
        debug!("Manifest change: {} {:?}", file, change.path);
        doc.apply(&change)
    }

    /// Flush every dirty document, in path order.
    pub fn flush_all(&self) -> EngineResult<()> {
        for doc in self.docs.values() {
            doc.flush()?;
        }
        Ok(())
    }
}
