//! Resolved answer values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Separator accepted in delimited list encodings.
pub const LIST_SEPARATOR: char = ',';

/// A concrete value for one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    List(Vec<String>),
    Str(String),
}

impl AnswerValue {
    /// The scalar string form, if this value has one. Lists do not.
    pub fn scalar_form(&self) -> Option<String> {
        match self {
            AnswerValue::Bool(b) => Some(b.to_string()),
            AnswerValue::Str(s) => Some(s.clone()),
            AnswerValue::List(_) => None,
        }
    }

    /// A single-line rendering used for logging and persisted documents.
    pub fn display_form(&self) -> String {
        match self {
            AnswerValue::Bool(b) => b.to_string(),
            AnswerValue::Str(s) => s.clone(),
            AnswerValue::List(items) => items.join(","),
        }
    }
}

/// Normalize list items to an ordered, deduplicated set.
pub fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .filter(|i| seen.insert(i.clone()))
        .collect()
}

/// Parse the delimited-string encoding of a list.
///
/// A value consisting solely of separators denotes the empty set.
pub fn parse_delimited_list(raw: &str) -> Vec<String> {
    normalize_list(raw.split(LIST_SEPARATOR).map(String::from).collect())
}

/// The complete, immutable answer set for one run.
///
/// Built once by the resolver in prompt-declaration order, then passed
/// read-only to every handler.
#[derive(Debug, Clone, Default)]
pub struct Answers {
    values: HashMap<String, AnswerValue>,
    order: Vec<String>,
}

impl Answers {
    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Bool answer, defaulting to false when absent or non-bool.
    pub fn enabled(&self, id: &str) -> bool {
        matches!(self.values.get(id), Some(AnswerValue::Bool(true)))
    }

    pub fn string(&self, id: &str) -> Option<&str> {
        match self.values.get(id) {
            Some(AnswerValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, id: &str) -> Option<&[String]> {
        match self.values.get(id) {
            Some(AnswerValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, value: AnswerValue) {
        let id = id.into();
        if !self.values.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.values.insert(id, value);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Iterate in prompt-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.order
            .iter()
            .filter_map(|id| self.values.get(id).map(|v| (id.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_list_dedupes_in_order() {
        let items = vec!["solr".into(), "redis".into(), "solr".into(), " redis ".into()];
        assert_eq!(normalize_list(items), vec!["solr", "redis"]);
    }

    #[test]
    fn test_delimited_list_parsing() {
        assert_eq!(parse_delimited_list("solr,redis"), vec!["solr", "redis"]);
        assert_eq!(parse_delimited_list("solr, redis ,solr"), vec!["solr", "redis"]);
    }

    #[test]
    fn test_separator_only_is_empty_set() {
        assert!(parse_delimited_list(",").is_empty());
        assert!(parse_delimited_list(",,,").is_empty());
    }

    #[test]
    fn test_answers_iterate_in_insertion_order() {
        let mut answers = Answers::default();
        answers.insert("b", AnswerValue::Bool(true));
        answers.insert("a", AnswerValue::Str("x".into()));
        let ids: Vec<&str> = answers.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_untagged_value_deserialization() {
        let b: AnswerValue = serde_yaml::from_str("true").unwrap();
        let l: AnswerValue = serde_yaml::from_str("[a, b]").unwrap();
        let s: AnswerValue = serde_yaml::from_str("hello").unwrap();
        assert_eq!(b, AnswerValue::Bool(true));
        assert_eq!(l, AnswerValue::List(vec!["a".into(), "b".into()]));
        assert_eq!(s, AnswerValue::Str("hello".into()));
    }
}
