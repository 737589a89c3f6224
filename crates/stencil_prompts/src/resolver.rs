//! Layered answer resolution.
//!
//! Each prompt resolves to exactly one value. Source precedence:
//! structured config > environment variable > interactive input > default.
//! A prompt whose `depends_on` predicate evaluates false never consults any
//! source and takes its default.

use tracing::debug;

use crate::answers::{normalize_list, parse_delimited_list, AnswerValue, Answers};
use crate::error::{ConfigError, PromptResult};
use crate::model::{Prompt, PromptKind};
use crate::sources::Sources;

/// Resolve one answer per prompt, in declaration order.
///
/// Declaration order matters: `depends_on` predicates see only the answers
/// of prompts declared earlier.
pub fn resolve(prompts: &[Prompt], sources: &mut Sources) -> PromptResult<Answers> {
    let mut answers = Answers::default();

    for prompt in prompts {
        if let Some(cond) = &prompt.depends_on {
            if !cond.evaluate(&answers) {
                debug!("Prompt '{}' skipped, taking default", prompt.id);
                let fallback = validate(prompt, prompt.default.clone())?;
                answers.insert(&prompt.id, fallback);
                continue;
            }
        }

        let mut value = None;

        if let Some(doc) = &sources.config {
            if let Some(raw) = doc.get(&prompt.id) {
                debug!("Prompt '{}' resolved from config document", prompt.id);
                value = Some(coerce_yaml(prompt, raw)?);
            }
        }

        if value.is_none() {
            if let Some(raw) = sources.env.get(&prompt.env) {
                debug!("Prompt '{}' resolved from ${}", prompt.id, prompt.env);
                value = Some(parse_raw(prompt, raw)?);
            }
        }

        if value.is_none() {
            if let Some(input) = sources.interactive.as_mut() {
                let raw = input.ask(prompt)?;
                value = Some(parse_raw(prompt, &raw)?);
            }
        }

        let value = match value {
            Some(v) => v,
            None => prompt.default.clone(),
        };

        answers.insert(&prompt.id, validate(prompt, value)?);
    }

    Ok(answers)
}

/// Parse the raw string encoding used by environment and interactive values.
fn parse_raw(prompt: &Prompt, raw: &str) -> PromptResult<AnswerValue> {
    match prompt.kind {
        PromptKind::Bool => parse_bool(raw)
            .map(AnswerValue::Bool)
            .ok_or_else(|| ConfigError::InvalidValue {
                prompt: prompt.id.clone(),
                message: format!("'{}' is not a boolean", raw),
            }),
        PromptKind::List => Ok(AnswerValue::List(parse_delimited_list(raw))),
        PromptKind::Enum | PromptKind::String => Ok(AnswerValue::Str(raw.to_string())),
    }
}

/// Coerce a YAML config value to the prompt's kind.
///
/// Lists accept either an explicit sequence or a single delimited string;
/// both normalize to the same representation.
fn coerce_yaml(prompt: &Prompt, value: &serde_yaml::Value) -> PromptResult<AnswerValue> {
    let invalid = |message: String| ConfigError::InvalidValue {
        prompt: prompt.id.clone(),
        message,
    };

    match prompt.kind {
        PromptKind::Bool => match value {
            serde_yaml::Value::Bool(b) => Ok(AnswerValue::Bool(*b)),
            serde_yaml::Value::String(s) => parse_bool(s)
                .map(AnswerValue::Bool)
                .ok_or_else(|| invalid(format!("'{}' is not a boolean", s))),
            other => Err(invalid(format!("expected a boolean, got {:?}", other))),
        },
        PromptKind::List => match value {
            serde_yaml::Value::Sequence(items) => {
                let mut parsed = Vec::with_capacity(items.len());
                for item in items {
                    let s = scalar_string(item)
                        .ok_or_else(|| invalid("list items must be scalars".to_string()))?;
                    parsed.push(s);
                }
                Ok(AnswerValue::List(normalize_list(parsed)))
            }
            serde_yaml::Value::String(s) => Ok(AnswerValue::List(parse_delimited_list(s))),
            other => Err(invalid(format!("expected a list, got {:?}", other))),
        },
        PromptKind::Enum | PromptKind::String => scalar_string(value)
            .map(AnswerValue::Str)
            .ok_or_else(|| invalid("expected a scalar value".to_string())),
    }
}

fn scalar_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Check the value's shape against the prompt kind and its items against
/// `allowed`.
fn validate(prompt: &Prompt, value: AnswerValue) -> PromptResult<AnswerValue> {
    let invalid = |message: String| ConfigError::InvalidValue {
        prompt: prompt.id.clone(),
        message,
    };

    match (&prompt.kind, &value) {
        (PromptKind::Bool, AnswerValue::Bool(_)) => {}
        (PromptKind::List, AnswerValue::List(items)) => {
            if !prompt.allowed.is_empty() {
                for item in items {
                    if !prompt.allowed.contains(item) {
                        return Err(invalid(format!(
                            "'{}' is not one of: {}",
                            item,
                            prompt.allowed.join(", ")
                        )));
                    }
                }
            }
        }
        (PromptKind::Enum, AnswerValue::Str(s)) => {
            if !prompt.allowed.is_empty() && !prompt.allowed.contains(s) {
                return Err(invalid(format!(
                    "'{}' is not one of: {}",
                    s,
                    prompt.allowed.join(", ")
                )));
            }
        }
        (PromptKind::String, AnswerValue::Str(_)) => {}
        (kind, other) => {
            return Err(invalid(format!(
                "value {:?} does not match prompt kind {:?}",
                other, kind
            )))
        }
    }

    Ok(value)
}
