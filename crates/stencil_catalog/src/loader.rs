//! Descriptor loading.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Catalog, TemplateDescriptor};

/// File name of the template descriptor at the template root.
pub const DESCRIPTOR_FILE: &str = "stencil.yml";

/// Loads the `stencil.yml` descriptor carried by a template.
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Load the descriptor from a materialized template root.
    pub fn load(template_root: &Path) -> CatalogResult<TemplateDescriptor> {
        let path = template_root.join(DESCRIPTOR_FILE);
        if !path.exists() {
            return Err(CatalogError::DescriptorNotFound(path));
        }

        debug!("Loading template descriptor from {:?}", path);
        let content = fs::read_to_string(&path)?;
        let descriptor: TemplateDescriptor =
            serde_yaml::from_str(&content).map_err(|e| CatalogError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Self::validate(&descriptor)?;
        info!(
            "Loaded descriptor: {} prompts, {} catalog entries",
            descriptor.prompts.len(),
            descriptor.features.len()
        );
        Ok(descriptor)
    }

    /// Cross-check catalog entries against the declared prompts.
    fn validate(descriptor: &TemplateDescriptor) -> CatalogResult<()> {
        let mut seen = std::collections::HashSet::new();
        for prompt in &descriptor.prompts {
            if !seen.insert(prompt.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate prompt id '{}'",
                    prompt.id
                )));
            }
        }

        for entry in &descriptor.features {
            if !seen.contains(entry.prompt.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "catalog entry '{}' references undeclared prompt '{}'",
                    entry.id, entry.prompt
                )));
            }
            for change in &entry.manifest_changes {
                if !change.remove && change.value.is_none() {
                    return Err(CatalogError::Invalid(format!(
                        "manifest change '{}' in entry '{}' has neither value nor remove",
                        change.path, entry.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Load and index the catalog half of the descriptor.
    pub fn load_catalog(template_root: &Path) -> CatalogResult<(TemplateDescriptor, Catalog)> {
        let descriptor = Self::load(template_root)?;
        let catalog = Catalog::new(descriptor.features.clone())?;
        Ok((descriptor, catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DESCRIPTOR: &str = r#"
prompts:
  - id: name
    env: STENCIL_NAME
    kind: string
    default: my_site
  - id: services
    env: STENCIL_SERVICES
    kind: list
    allowed: [solr, redis, clamav]
    default: [solr]
features:
  - id: svc_solr
    prompt: services
    value: solr
    marker_token: SERVICE_SOLR
    owned_paths: ["docker/solr/**"]
    manifest_changes:
      - file: composer.json
        path: require.drupal/search_api_solr
        value: "^4.3"
"#;

    #[test]
    fn test_load_descriptor() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DESCRIPTOR_FILE), DESCRIPTOR).unwrap();

        let (descriptor, catalog) = DescriptorLoader::load_catalog(temp.path()).unwrap();
        assert_eq!(descriptor.prompts.len(), 2);
        assert!(catalog.by_marker_token("SERVICE_SOLR").is_some());
    }

    #[test]
    fn test_missing_descriptor() {
        let temp = tempdir().unwrap();
        let err = DescriptorLoader::load(temp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::DescriptorNotFound(_)));
    }

    #[test]
    fn test_entry_with_undeclared_prompt_rejected() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DESCRIPTOR_FILE),
            r#"
prompts: []
features:
  - id: orphan
    prompt: nowhere
"#,
        )
        .unwrap();

        let err = DescriptorLoader::load(temp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_change_without_value_or_remove_rejected() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DESCRIPTOR_FILE),
            r#"
prompts:
  - id: database
    env: STENCIL_DATABASE
    kind: bool
    default: true
features:
  - id: database
    prompt: database
    manifest_changes:
      - file: composer.json
        path: require.something
"#,
        )
        .unwrap();

        let err = DescriptorLoader::load(temp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }
}
