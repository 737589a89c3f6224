//! Post-run verification.
//!
//! The totality invariants are checked, not assumed: after a full run no
//! marker syntax, no soft-comment prefix, and no placeholder token may
//! remain in any file content or any path. The first finding aborts with
//! the offending file and token.

use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::markers::{CLOSE_MARKER, OPEN_MARKER, SOFT_PREFIX};
use crate::substitute::PLACEHOLDERS;
use crate::workspace::Workspace;

/// Scan the whole workspace for residual markers and placeholders.
pub fn assert_clean(workspace: &Workspace) -> EngineResult<()> {
    for relative in workspace.files() {
        check_path(&relative)?;

        let Some(content) = workspace.read_text(&relative)? else {
            continue;
        };
        check_content(&relative, &content)?;
    }
    debug!("Workspace clean: no residual markers or placeholders");
    Ok(())
}

fn check_path(relative: &Path) -> EngineResult<()> {
    let path_str = relative.to_string_lossy();
    for placeholder in PLACEHOLDERS {
        if path_str.contains(placeholder) {
            return Err(EngineError::ResidualToken {
                path: relative.to_path_buf(),
                token: placeholder.to_string(),
            });
        }
    }
    Ok(())
}

fn check_content(relative: &Path, content: &str) -> EngineResult<()> {
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(OPEN_MARKER) || trimmed.starts_with(CLOSE_MARKER) {
            return Err(EngineError::ResidualToken {
                path: relative.to_path_buf(),
                token: trimmed.split_whitespace().take(2).collect::<Vec<_>>().join(" "),
            });
        }
        if trimmed.starts_with(SOFT_PREFIX) {
            return Err(EngineError::ResidualToken {
                path: relative.to_path_buf(),
                token: SOFT_PREFIX.to_string(),
            });
        }
    }

    for placeholder in PLACEHOLDERS {
        if content.contains(placeholder) {
            return Err(EngineError::ResidualToken {
                path: relative.to_path_buf(),
                token: placeholder.to_string(),
            });
        }
    }
    Ok(())
}
