//! Answer sources.
//!
//! Three sources can supply a value for a prompt, consulted in precedence
//! order: a structured config document, the process environment, and an
//! interactive callback. Terminal rendering of prompts is out of scope;
//! callers supply a [`PromptInput`] implementation or nothing at all.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, PromptResult};
use crate::model::Prompt;

/// A parsed key→value config document (file or inline literal).
///
/// The document is validated as a whole before any prompt consults it;
/// a malformed document is fatal for the run.
#[derive(Debug, Clone, Default)]
pub struct ConfigDoc {
    source_name: String,
    values: BTreeMap<String, serde_yaml::Value>,
}

impl ConfigDoc {
    /// Parse a config document from a file.
    pub fn from_file(path: &Path) -> PromptResult<Self> {
        debug!("Loading config document from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Parse a config document from an inline literal.
    pub fn from_literal(content: &str) -> PromptResult<Self> {
        Self::parse("<inline>", content)
    }

    fn parse(source_name: &str, content: &str) -> PromptResult<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        let mapping = match value {
            serde_yaml::Value::Mapping(m) => m,
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            other => {
                return Err(ConfigError::Parse {
                    source_name: source_name.to_string(),
                    message: format!("expected a key/value mapping, got {:?}", other),
                })
            }
        };

        let mut values = BTreeMap::new();
        for (key, val) in mapping {
            let key = key.as_str().ok_or_else(|| ConfigError::Parse {
                source_name: source_name.to_string(),
                message: "non-string key in config document".to_string(),
            })?;
            values.insert(key.to_string(), val);
        }

        Ok(Self {
            source_name: source_name.to_string(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.values.get(key)
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Merge another document over this one (the other wins on conflicts).
    pub fn overlay(&mut self, other: ConfigDoc) {
        self.values.extend(other.values);
    }
}

/// Interactive answer source. One raw value per prompt, parsed with the
/// same rules as environment values.
#[cfg_attr(test, mockall::automock)]
pub trait PromptInput {
    fn ask(&mut self, prompt: &Prompt) -> PromptResult<String>;
}

/// The layered sources for one resolution run.
pub struct Sources {
    pub config: Option<ConfigDoc>,
    pub env: HashMap<String, String>,
    pub interactive: Option<Box<dyn PromptInput>>,
}

impl Sources {
    /// Sources with a snapshot of the process environment and nothing else.
    pub fn from_process_env() -> Self {
        Self {
            config: None,
            env: std::env::vars().collect(),
            interactive: None,
        }
    }

    /// Empty sources; every prompt falls back to its default.
    pub fn empty() -> Self {
        Self {
            config: None,
            env: HashMap::new(),
            interactive: None,
        }
    }

    pub fn with_config(mut self, config: ConfigDoc) -> Self {
        match &mut self.config {
            Some(existing) => existing.overlay(config),
            None => self.config = Some(config),
        }
        self
    }

    pub fn with_interactive(mut self, input: Box<dyn PromptInput>) -> Self {
        self.interactive = Some(input);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_document() {
        let doc = ConfigDoc::from_literal("name: my_site\nservices: [solr]\n").unwrap();
        assert!(doc.get("name").is_some());
        assert!(doc.get("missing").is_none());
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let err = ConfigDoc::from_literal("- not\n- a\n- mapping\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let doc = ConfigDoc::from_literal("").unwrap();
        assert!(doc.get("anything").is_none());
    }

    #[test]
    fn test_overlay_later_wins() {
        let mut base = ConfigDoc::from_literal("name: first\nkeep: yes\n").unwrap();
        base.overlay(ConfigDoc::from_literal("name: second\n").unwrap());
        assert_eq!(base.get("name").and_then(|v| v.as_str()), Some("second"));
        assert!(base.get("keep").is_some());
    }
}
