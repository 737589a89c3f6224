//! Persisted project state.
//!
//! A successful run writes `.stencil.yml` at the project root: the pinned
//! source, its reference, and every resolved answer. The update path reads
//! it back and feeds the answers in as the config-document source, so a
//! project updates with the answers it was created with.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use stencil_prompts::{Answers, ConfigDoc};

use crate::error::{EngineError, EngineResult};

/// File name of the persisted state at the project root.
pub const STATE_FILE: &str = ".stencil.yml";

/// Everything a later update needs to re-run the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectState {
    /// Template location (local path or git URL).
    pub source: String,
    /// Pinned reference (tag, branch, or commit).
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    /// Resolved answers, keyed by prompt id, in declaration order.
    pub answers: serde_yaml::Mapping,
}

impl ProjectState {
    pub fn new(source: String, reference: Option<String>, answers: &Answers) -> Self {
        let mut mapping = serde_yaml::Mapping::new();
        for (id, value) in answers.iter() {
            let yaml = serde_yaml::to_value(value).unwrap_or(serde_yaml::Value::Null);
            mapping.insert(serde_yaml::Value::String(id.to_string()), yaml);
        }
        Self {
            source,
            reference,
            answers: mapping,
        }
    }

    pub fn load(project_root: &Path) -> EngineResult<Self> {
        let path = project_root.join(STATE_FILE);
        if !path.exists() {
            return Err(EngineError::ProjectNotInitialized(path));
        }
        debug!("Loading project state from {:?}", path);
        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| EngineError::Manifest {
            path,
            message: format!("unreadable project state: {}", e),
        })
    }

    pub fn save(&self, project_root: &Path) -> EngineResult<()> {
        let path = project_root.join(STATE_FILE);
        let content = serde_yaml::to_string(self).map_err(|e| EngineError::Manifest {
            path: path.clone(),
            message: format!("unwritable project state: {}", e),
        })?;
        fs::write(&path, content)?;
        debug!("Wrote project state to {:?}", path);
        Ok(())
    }

    /// The persisted answers as a config document, for resolution with the
    /// standard precedence rules.
    pub fn answers_config(&self) -> EngineResult<ConfigDoc> {
        let content =
            serde_yaml::to_string(&self.answers).map_err(|e| EngineError::Manifest {
                path: PathBuf::from(STATE_FILE),
                message: e.to_string(),
            })?;
        Ok(ConfigDoc::from_literal(&content)?)
    }
}
