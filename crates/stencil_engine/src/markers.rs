//! Marker-block conditional processing.
//!
//! Template files carry line-oriented markers delimiting regions whose
//! inclusion depends on resolved answers:
//!
//! ```text
//! #;< SERVICE_SOLR
//! services:
//! #;   solr:
//! #;     image: solr:8
//! #;> SERVICE_SOLR
//! ```
//!
//! `#;< TOKEN` opens a block (`#;< !TOKEN` negates it), `#;> TOKEN` closes
//! it, and blocks nest. Lines inside a kept block lose their `#;`
//! soft-comment prefix; lines inside a removed block are dropped. Marker
//! lines themselves never reach the output. This is deliberately a
//! three-state line machine with a stack, not a templating language: the
//! grammar has no loops and no expressions.

use std::path::Path;

use regex::Regex;

use stencil_catalog::Catalog;
use stencil_prompts::Answers;

use crate::error::{EngineError, EngineResult};

/// Soft-comment prefix stripped from kept lines.
pub const SOFT_PREFIX: &str = "#;";
/// Opening marker prefix.
pub const OPEN_MARKER: &str = "#;<";
/// Closing marker prefix.
pub const CLOSE_MARKER: &str = "#;>";

struct Frame {
    token: String,
    /// Whether this block and every enclosing block are kept.
    keep: bool,
}

/// Line-oriented marker-block processor.
pub struct MarkerProcessor {
    open_re: Regex,
    close_re: Regex,
}

impl Default for MarkerProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerProcessor {
    pub fn new() -> Self {
        Self {
            open_re: Regex::new(r"^#;<\s+(!?)([A-Za-z0-9_]+)\s*$").unwrap(),
            close_re: Regex::new(r"^#;>\s+([A-Za-z0-9_]+)\s*$").unwrap(),
        }
    }

    /// Process one file's content. The returned text contains no marker
    /// lines and no soft-comment prefixes.
    pub fn process(
        &self,
        path: &Path,
        content: &str,
        answers: &Answers,
        catalog: &Catalog,
    ) -> EngineResult<String> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut output: Vec<String> = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim_start();

            if let Some(caps) = self.open_re.captures(trimmed) {
                let negated = &caps[1] == "!";
                let token = caps[2].to_string();
                let enabled = catalog.token_enabled(&token, answers).ok_or_else(|| {
                    EngineError::MalformedTemplate {
                        path: path.to_path_buf(),
                        line: line_no,
                        message: format!("unknown marker token '{}'", token),
                    }
                })?;
                let keep_here = if negated { !enabled } else { enabled };
                let keep = stack.last().map_or(true, |f| f.keep) && keep_here;
                stack.push(Frame { token, keep });
                continue;
            }

            if let Some(caps) = self.close_re.captures(trimmed) {
                let token = &caps[1];
                match stack.pop() {
                    Some(frame) if frame.token == token => {}
                    Some(frame) => {
                        return Err(EngineError::MalformedTemplate {
                            path: path.to_path_buf(),
                            line: line_no,
                            message: format!(
                                "marker '{}' closed while '{}' is open",
                                token, frame.token
                            ),
                        })
                    }
                    None => {
                        return Err(EngineError::MalformedTemplate {
                            path: path.to_path_buf(),
                            line: line_no,
                            message: format!("marker '{}' closed but never opened", token),
                        })
                    }
                }
                continue;
            }

            match stack.last() {
                None => output.push(line.to_string()),
                Some(frame) if frame.keep => output.push(strip_soft_prefix(line)),
                Some(_) => {} // inside a removed block
            }
        }

        if let Some(frame) = stack.pop() {
            return Err(EngineError::MalformedTemplate {
                path: path.to_path_buf(),
                line: content.lines().count(),
                message: format!("marker '{}' opened but never closed", frame.token),
            });
        }

        let mut result = output.join("\n");
        if content.ends_with('\n') && !output.is_empty() {
            result.push('\n');
        }
        Ok(result)
    }
}

/// Strip one soft-comment prefix from a kept line, preserving indentation.
/// Lines carry a single prefix regardless of nesting depth.
fn strip_soft_prefix(line: &str) -> String {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    if let Some(rest) = trimmed.strip_prefix(SOFT_PREFIX) {
        // Marker prefixes were handled before this point; a bare "#;" or
        // "#; " prefix is the soft-comment form.
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        return format!("{}{}", indent, rest);
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_catalog::FeatureEntry;
    use stencil_prompts::AnswerValue;

    fn catalog_with_tokens(tokens: &[(&str, &str)]) -> Catalog {
        let entries = tokens
            .iter()
            .map(|(token, prompt)| FeatureEntry {
                id: token.to_lowercase(),
                prompt: prompt.to_string(),
                value: None,
                marker_token: Some(token.to_string()),
                owned_paths: vec![],
                manifest_changes: vec![],
                moves: vec![],
            })
            .collect();
        Catalog::new(entries).unwrap()
    }

    fn answers_bool(pairs: &[(&str, bool)]) -> Answers {
        let mut answers = Answers::default();
        for (id, value) in pairs {
            answers.insert(*id, AnswerValue::Bool(*value));
        }
        answers
    }

    fn process(content: &str, answers: &Answers, catalog: &Catalog) -> EngineResult<String> {
        MarkerProcessor::new().process(Path::new("test.yml"), content, answers, catalog)
    }

    #[test]
    fn test_kept_block_strips_prefix() {
        let catalog = catalog_with_tokens(&[("DATABASE", "database")]);
        let answers = answers_bool(&[("database", true)]);
        let content = "before\n#;< DATABASE\n#; image: mariadb\nplain line\n#;> DATABASE\nafter\n";
        let result = process(content, &answers, &catalog).unwrap();
        assert_eq!(result, "before\nimage: mariadb\nplain line\nafter\n");
    }

    #[test]
    fn test_removed_block_drops_lines() {
        let catalog = catalog_with_tokens(&[("DATABASE", "database")]);
        let answers = answers_bool(&[("database", false)]);
        let content = "before\n#;< DATABASE\n#; image: mariadb\n#;> DATABASE\nafter\n";
        let result = process(content, &answers, &catalog).unwrap();
        assert_eq!(result, "before\nafter\n");
    }

    #[test]
    fn test_negated_block_inverts() {
        let catalog = catalog_with_tokens(&[("DATABASE", "database")]);
        let answers = answers_bool(&[("database", false)]);
        let content = "#;< !DATABASE\nno database configured\n#;> DATABASE\n";
        let result = process(content, &answers, &catalog).unwrap();
        assert_eq!(result, "no database configured\n");
    }

    #[test]
    fn test_nested_blocks() {
        let catalog = catalog_with_tokens(&[("OUTER", "outer"), ("INNER", "inner")]);
        let answers = answers_bool(&[("outer", true), ("inner", false)]);
        let content = "\
#;< OUTER
outer line
#;< INNER
inner line
#;> INNER
#;> OUTER
";
        let result = process(content, &answers, &catalog).unwrap();
        assert_eq!(result, "outer line\n");
    }

    #[test]
    fn test_removed_outer_drops_kept_inner() {
        let catalog = catalog_with_tokens(&[("OUTER", "outer"), ("INNER", "inner")]);
        let answers = answers_bool(&[("outer", false), ("inner", true)]);
        let content = "#;< OUTER\n#;< INNER\ninner line\n#;> INNER\n#;> OUTER\n";
        let result = process(content, &answers, &catalog).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_nested_kept_blocks_strip_recursively() {
        let catalog = catalog_with_tokens(&[("OUTER", "outer"), ("INNER", "inner")]);
        let answers = answers_bool(&[("outer", true), ("inner", true)]);
        let content = "#;< OUTER\n#;< INNER\n#;   indented: value\n#;> INNER\n#;> OUTER\n";
        let result = process(content, &answers, &catalog).unwrap();
        assert_eq!(result, "  indented: value\n");
    }

    #[test]
    fn test_unknown_token_is_fatal() {
        let catalog = catalog_with_tokens(&[]);
        let answers = Answers::default();
        let err = process("#;< MYSTERY\n#;> MYSTERY\n", &answers, &catalog).unwrap_err();
        assert!(matches!(err, EngineError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_mismatched_close_is_fatal() {
        let catalog = catalog_with_tokens(&[("A", "a"), ("B", "b")]);
        let answers = answers_bool(&[("a", true), ("b", true)]);
        let err = process("#;< A\n#;> B\n", &answers, &catalog).unwrap_err();
        assert!(matches!(err, EngineError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_unclosed_block_is_fatal() {
        let catalog = catalog_with_tokens(&[("A", "a")]);
        let answers = answers_bool(&[("a", true)]);
        let err = process("#;< A\nline\n", &answers, &catalog).unwrap_err();
        assert!(matches!(err, EngineError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_file_without_markers_unchanged() {
        let catalog = catalog_with_tokens(&[]);
        let answers = Answers::default();
        let content = "plain\nlines\nonly\n";
        assert_eq!(process(content, &answers, &catalog).unwrap(), content);
    }

    #[test]
    fn test_bare_soft_prefix_becomes_empty_line() {
        let catalog = catalog_with_tokens(&[("A", "a")]);
        let answers = answers_bool(&[("a", true)]);
        let result = process("#;< A\n#;\n#;> A\n", &answers, &catalog).unwrap();
        assert_eq!(result, "\n");
    }
}
