//! Prompt declarations.
//!
//! Prompts are the configurable dimensions of a template. They are declared
//! once in the template descriptor, loaded at startup, and never mutated.

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerValue, Answers};

/// The value shape a prompt resolves to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// A yes/no switch.
    Bool,
    /// One value out of `allowed`.
    Enum,
    /// An ordered, deduplicated set of values.
    List,
    /// Free-form text.
    String,
}

/// A predicate over already-resolved answers.
///
/// With neither `equals` nor `contains`, the referenced answer must be a
/// bool that is true. `equals` compares the answer's scalar form;
/// `contains` checks list membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub prompt: String,
    #[serde(default)]
    pub equals: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl Condition {
    /// Evaluate against the answers resolved so far. An unresolved
    /// referenced prompt evaluates false.
    pub fn evaluate(&self, answers: &Answers) -> bool {
        let Some(value) = answers.get(&self.prompt) else {
            return false;
        };

        if let Some(expected) = &self.equals {
            return value.scalar_form().as_deref() == Some(expected.as_str());
        }
        if let Some(item) = &self.contains {
            return match value {
                AnswerValue::List(items) => items.iter().any(|i| i == item),
                _ => false,
            };
        }
        matches!(value, AnswerValue::Bool(true))
    }
}

/// A declared configurable dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique prompt identifier; keys config documents and persisted answers.
    pub id: String,
    /// Environment variable consulted for this prompt.
    pub env: String,
    pub kind: PromptKind,
    /// Human-readable question text.
    #[serde(default)]
    pub description: Option<String>,
    /// Valid values for `enum` prompts and list items.
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Fallback value, also used when `depends_on` evaluates false.
    pub default: AnswerValue,
    /// Skip this prompt (taking `default`) unless the condition holds.
    #[serde(default)]
    pub depends_on: Option<Condition>,
}
