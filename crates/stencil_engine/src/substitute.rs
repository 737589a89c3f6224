//! Token and rename substitution.
//!
//! Every placeholder family is derived from a single canonical identifier,
//! so one correct answer makes every case variant correct. The pass runs
//! strictly last among content-mutating passes: it rewrites both file
//! contents and path segments, and must therefore see the final set of
//! files (post-deletion, post-marker-removal).

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use stencil_prompts::Answers;

use crate::error::EngineResult;
use crate::workspace::Workspace;

/// Placeholder for the project machine name; other variants derive from it.
pub const SITE_PLACEHOLDER: &str = "your_site";
/// Placeholder for the organization machine name.
pub const ORG_PLACEHOLDER: &str = "your_org";

/// All fixed placeholder tokens, for the residual scan.
pub const PLACEHOLDERS: [&str; 8] = [
    "your_site",
    "YOUR_SITE",
    "YourSite",
    "Your Site",
    "your_org",
    "YOUR_ORG",
    "YourOrg",
    "Your Org",
];

/// Project identifiers, all case variants derived from the canonical
/// machine names supplied by the answers.
#[derive(Debug, Clone)]
pub struct ProjectIdentity {
    pub machine_name: String,
    pub org_machine_name: String,
    pub human_name: String,
    pub org_human_name: String,
    /// Abbreviated prefix (first letter of each machine-name word).
    pub prefix: String,
}

impl ProjectIdentity {
    /// Build the identity from reserved answer ids: `name`, `org`, and the
    /// optional `human_name` override.
    pub fn from_answers(answers: &Answers) -> Self {
        let machine_name = to_machine_name(answers.string("name").unwrap_or("my_site"));
        let org_machine_name = answers
            .string("org")
            .map(to_machine_name)
            .unwrap_or_else(|| format!("{}_org", machine_name));
        let human_name = answers
            .string("human_name")
            .map(String::from)
            .unwrap_or_else(|| to_human(&machine_name));
        let org_human_name = to_human(&org_machine_name);
        let prefix = abbreviate(&machine_name);

        Self {
            machine_name,
            org_machine_name,
            human_name,
            org_human_name,
            prefix,
        }
    }
}

/// Applies the placeholder table to contents and paths.
pub struct Substituter {
    /// Fixed-string replacements, longest placeholder first.
    replacements: Vec<(&'static str, String)>,
    /// Abbreviation placeholders need a word boundary; a plain substring
    /// replace would corrupt words like `keys_`.
    prefix_lower: Regex,
    prefix_upper: Regex,
    prefix_value: String,
}

impl Substituter {
    pub fn new(identity: &ProjectIdentity) -> Self {
        let mut replacements = vec![
            ("your_site", identity.machine_name.clone()),
            ("YOUR_SITE", to_upper_snake(&identity.machine_name)),
            ("YourSite", to_pascal(&identity.machine_name)),
            ("Your Site", identity.human_name.clone()),
            ("your_org", identity.org_machine_name.clone()),
            ("YOUR_ORG", to_upper_snake(&identity.org_machine_name)),
            ("YourOrg", to_pascal(&identity.org_machine_name)),
            ("Your Org", identity.org_human_name.clone()),
        ];
        replacements.sort_by_key(|(p, _)| std::cmp::Reverse(p.len()));

        Self {
            replacements,
            prefix_lower: Regex::new(r"\bys_").unwrap(),
            prefix_upper: Regex::new(r"\bYS_").unwrap(),
            prefix_value: identity.prefix.clone(),
        }
    }

    /// Substitute every placeholder in a string.
    pub fn apply(&self, input: &str) -> String {
        let mut result = input.to_string();
        for (placeholder, value) in &self.replacements {
            result = result.replace(placeholder, value);
        }
        result = self
            .prefix_lower
            .replace_all(&result, format!("{}_", self.prefix_value).as_str())
            .to_string();
        result = self
            .prefix_upper
            .replace_all(&result, format!("{}_", self.prefix_value.to_uppercase()).as_str())
            .to_string();
        result
    }

    /// Rewrite contents of every text file, then rename paths deepest
    /// first so no stale intermediate path is ever used.
    pub fn run(&self, workspace: &Workspace) -> EngineResult<()> {
        for relative in workspace.files() {
            if let Some(text) = workspace.read_text(&relative)? {
                let replaced = self.apply(&text);
                if replaced != text {
                    workspace.write_text(&relative, &replaced)?;
                    debug!("Substituted tokens in {:?}", relative);
                }
            }
        }

        for relative in workspace.entries_deepest_first() {
            self.rename_if_needed(workspace, &relative)?;
        }

        Ok(())
    }

    fn rename_if_needed(&self, workspace: &Workspace, relative: &Path) -> EngineResult<()> {
        let Some(name) = relative.file_name().and_then(|n| n.to_str()) else {
            return Ok(());
        };
        let renamed = self.apply(name);
        if renamed == name {
            return Ok(());
        }

        let target: PathBuf = match relative.parent() {
            Some(parent) => parent.join(&renamed),
            None => PathBuf::from(&renamed),
        };
        fs::rename(workspace.absolute(relative), workspace.absolute(&target))?;
        debug!("Renamed {:?} -> {:?}", relative, target);
        Ok(())
    }
}

/// Lowercase snake form of an arbitrary identifier.
fn to_machine_name(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else if c == '-' || c == ' ' {
            if !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(c);
        }
    }
    result.trim_matches('_').to_string()
}

fn to_upper_snake(s: &str) -> String {
    s.to_uppercase()
}

fn to_pascal(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

fn to_human(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn abbreviate(s: &str) -> String {
    let abbr: String = s
        .split('_')
        .filter_map(|part| part.chars().next())
        .collect();
    if abbr.len() >= 2 {
        abbr
    } else {
        s.chars().take(2).collect()
    }
}
