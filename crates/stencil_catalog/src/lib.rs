//! # stencil_catalog
//!
//! Template descriptor and feature catalog for stencil.
//!
//! A template carries a `stencil.yml` descriptor declaring its prompts and
//! its feature catalog. The catalog maps each selectable item to the marker
//! token, manifest entries, owned paths, and moves it controls; it is loaded
//! once per run and read-only afterwards.

pub mod error;
pub mod loader;
pub mod model;

pub use error::{CatalogError, CatalogResult};
pub use loader::{DescriptorLoader, DESCRIPTOR_FILE};
pub use model::{Catalog, FeatureEntry, ManifestChange, MoveSpec, TemplateDescriptor};
