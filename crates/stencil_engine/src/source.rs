//! Template source fetching.
//!
//! A source is a location plus a pinned reference; fetching materializes an
//! immutable snapshot into a directory. The engine only requires that a
//! tree appears — local copy and shallow git clone are the two transports.

use std::path::{Path, PathBuf};
use std::process::Command;

use fs_extra::dir::CopyOptions;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

/// Where a template snapshot comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// A directory on disk, copied as-is.
    Local { path: PathBuf },
    /// A git repository cloned shallowly at a tag, branch, or commit-ish
    /// reference.
    Git {
        url: String,
        reference: Option<String>,
    },
}

impl TemplateSource {
    /// Classify a location string: an existing directory is local,
    /// anything else is treated as a git URL.
    pub fn parse(location: &str, reference: Option<String>) -> Self {
        let path = PathBuf::from(location);
        if path.is_dir() {
            TemplateSource::Local { path }
        } else {
            TemplateSource::Git {
                url: location.to_string(),
                reference,
            }
        }
    }

    /// The location string as given, used for persistence and messages.
    pub fn location(&self) -> String {
        match self {
            TemplateSource::Local { path } => path.display().to_string(),
            TemplateSource::Git { url, .. } => url.clone(),
        }
    }

    /// Materialize the snapshot into `dest`. `dest` must exist and be a
    /// directory; the template's own `.git` never lands in the snapshot.
    pub fn fetch(&self, dest: &Path) -> EngineResult<()> {
        match self {
            TemplateSource::Local { path } => self.fetch_local(path, dest),
            TemplateSource::Git { url, reference } => {
                self.fetch_git(url, reference.as_deref(), dest)
            }
        }
    }

    fn fetch_local(&self, path: &Path, dest: &Path) -> EngineResult<()> {
        info!("Copying template from {:?}", path);
        if !path.is_dir() {
            return Err(EngineError::SourceFetch {
                location: self.location(),
                message: "not a directory".to_string(),
            });
        }

        let options = CopyOptions::new().content_only(true);
        fs_extra::dir::copy(path, dest, &options).map_err(|e| EngineError::SourceFetch {
            location: self.location(),
            message: e.to_string(),
        })?;

        let git_dir = dest.join(".git");
        if git_dir.exists() {
            std::fs::remove_dir_all(git_dir)?;
        }
        Ok(())
    }

    fn fetch_git(&self, url: &str, reference: Option<&str>, dest: &Path) -> EngineResult<()> {
        info!("Cloning template from {} ({})", url, reference.unwrap_or("default branch"));

        let mut args = vec!["clone", "--depth", "1"];
        if let Some(reference) = reference {
            args.push("--branch");
            args.push(reference);
        }
        args.push(url);
        let dest_str = dest.to_string_lossy().to_string();
        args.push(&dest_str);

        debug!("Running git {:?}", args);
        let output = Command::new("git").args(&args).output().map_err(|e| {
            EngineError::SourceFetch {
                location: self.location(),
                message: format!("failed to run git: {}", e),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::SourceFetch {
                location: self.location(),
                message: format!("git clone failed: {}", stderr.trim()),
            });
        }

        let git_dir = dest.join(".git");
        if git_dir.exists() {
            std::fs::remove_dir_all(git_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_existing_dir_is_local() {
        let temp = tempdir().unwrap();
        let source = TemplateSource::parse(temp.path().to_str().unwrap(), None);
        assert!(matches!(source, TemplateSource::Local { .. }));
    }

    #[test]
    fn test_parse_url_is_git() {
        let source = TemplateSource::parse("https://example.com/template.git", Some("1.2.0".into()));
        assert!(matches!(source, TemplateSource::Git { .. }));
    }

    #[test]
    fn test_local_fetch_copies_contents() {
        let template = tempdir().unwrap();
        fs::create_dir_all(template.path().join("web")).unwrap();
        fs::write(template.path().join("web/index.php"), "<?php").unwrap();
        fs::create_dir_all(template.path().join(".git")).unwrap();
        fs::write(template.path().join(".git/HEAD"), "ref").unwrap();

        let dest = tempdir().unwrap();
        let source = TemplateSource::Local {
            path: template.path().to_path_buf(),
        };
        source.fetch(dest.path()).unwrap();

        assert!(dest.path().join("web/index.php").exists());
        assert!(!dest.path().join(".git").exists());
    }

    #[test]
    fn test_local_fetch_missing_dir_fails() {
        let dest = tempdir().unwrap();
        let source = TemplateSource::Local {
            path: PathBuf::from("/nonexistent/template"),
        };
        assert!(matches!(
            source.fetch(dest.path()),
            Err(EngineError::SourceFetch { .. })
        ));
    }
}
