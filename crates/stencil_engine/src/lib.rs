//! # stencil_engine
//!
//! The resolution-and-transformation engine for stencil.
//!
//! One run materializes a template snapshot into a workspace and
//! transforms it against a resolved answer set:
//!
//! 1. Feature handlers delete disabled-feature files, apply moves, and
//!    queue manifest changes (one shared in-memory document per manifest).
//! 2. The marker-block processor keeps or removes conditional regions.
//! 3. Manifests flush exactly once.
//! 4. The token/rename substitution pass rewrites contents and paths, last.
//! 5. A verification scan proves no marker or placeholder survived.
//!
//! The engine is deterministic (identical inputs produce byte-identical
//! trees), total (nothing template-syntactic leaks into output), and safe
//! to re-run (its own output is a fixed point). The update reconciler
//! rebuilds a newer template revision in a scratch directory and promotes
//! only engine-owned paths into the existing project.

pub mod error;
pub mod handler;
pub mod install;
pub mod manifest;
pub mod markers;
pub mod persist;
pub mod pipeline;
pub mod source;
pub mod substitute;
pub mod update;
pub mod verify;
pub mod workspace;

pub use error::{EngineError, EngineResult};
pub use handler::{FeatureHandler, Handler, MarkerHandler, PipelineContext, RenameHandler};
pub use install::{install, InstallReport};
pub use manifest::{Change, ChangeOp, ManifestDocument, ManifestSet};
pub use markers::MarkerProcessor;
pub use persist::{ProjectState, STATE_FILE};
pub use pipeline::Pipeline;
pub use source::TemplateSource;
pub use substitute::{ProjectIdentity, Substituter};
pub use update::{update, UpdateReport};
pub use workspace::Workspace;
