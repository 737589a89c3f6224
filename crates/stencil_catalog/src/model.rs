//! Feature catalog data model.
//!
//! The catalog is pure data: each entry maps a selectable item to the
//! marker token, manifest entries, and owned paths it controls. Adding a
//! selectable feature means adding an entry to the template descriptor,
//! never touching engine control flow.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stencil_prompts::{AnswerValue, Answers, Prompt};

use crate::error::{CatalogError, CatalogResult};

/// One structured edit to a dependency manifest.
///
/// `path` is a dotted object path inside the manifest document. Without
/// `remove`, the entry is upserted to `value`; with `remove: true` it is
/// deleted (a no-op when absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestChange {
    /// Manifest file, relative to the workspace root.
    pub file: String,
    pub path: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub remove: bool,
}

/// A file or directory move applied when the feature is enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSpec {
    pub from: String,
    pub to: String,
}

/// One selectable feature and everything it controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub id: String,
    /// Prompt whose answer drives this entry.
    pub prompt: String,
    /// For enum prompts, the selecting value; for list prompts, the item
    /// whose membership enables the entry. Bool prompts omit it.
    #[serde(default)]
    pub value: Option<String>,
    /// Marker token this entry registers for the block processor.
    #[serde(default)]
    pub marker_token: Option<String>,
    /// Globs (workspace-relative) deleted when the feature is disabled and
    /// overwritten unconditionally on update.
    #[serde(default)]
    pub owned_paths: Vec<String>,
    #[serde(default)]
    pub manifest_changes: Vec<ManifestChange>,
    #[serde(default)]
    pub moves: Vec<MoveSpec>,
}

impl FeatureEntry {
    /// Whether the resolved answers select this entry.
    pub fn enabled(&self, answers: &Answers) -> bool {
        match answers.get(&self.prompt) {
            Some(AnswerValue::Bool(b)) => match &self.value {
                Some(v) => v == &b.to_string(),
                None => *b,
            },
            Some(AnswerValue::Str(s)) => self.value.as_deref() == Some(s.as_str()),
            Some(AnswerValue::List(items)) => {
                self.value.as_ref().map_or(false, |v| items.contains(v))
            }
            None => false,
        }
    }
}

/// The template descriptor: prompts plus feature catalog, carried by the
/// template itself and never copied into output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub features: Vec<FeatureEntry>,
}

/// Read-only catalog, indexed by entry id and marker token.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<FeatureEntry>,
    by_token: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(entries: Vec<FeatureEntry>) -> CatalogResult<Self> {
        let mut by_token = HashMap::new();
        let mut seen_ids = std::collections::HashSet::new();

        for (idx, entry) in entries.iter().enumerate() {
            if !seen_ids.insert(entry.id.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate catalog entry id '{}'",
                    entry.id
                )));
            }
            if let Some(token) = &entry.marker_token {
                if by_token.insert(token.clone(), idx).is_some() {
                    return Err(CatalogError::Invalid(format!(
                        "marker token '{}' registered by more than one entry",
                        token
                    )));
                }
            }
        }

        Ok(Self { entries, by_token })
    }

    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    pub fn by_marker_token(&self, token: &str) -> Option<&FeatureEntry> {
        self.by_token.get(token).map(|idx| &self.entries[*idx])
    }

    /// Evaluate a marker token's predicate. `None` for unknown tokens.
    pub fn token_enabled(&self, token: &str, answers: &Answers) -> Option<bool> {
        self.by_marker_token(token).map(|e| e.enabled(answers))
    }
}
