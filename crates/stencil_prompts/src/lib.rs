//! # stencil_prompts
//!
//! Prompt registry and layered answer resolution for stencil.
//!
//! A template declares its configurable dimensions as prompts; this crate
//! resolves one concrete value per prompt from layered sources with a fixed
//! precedence:
//!
//! 1. Structured config document (file or inline literal)
//! 2. Process environment variable (per-prompt `env` name)
//! 3. Interactive callback
//! 4. Prompt default
//!
//! Prompts may depend on earlier prompts; a prompt whose `depends_on`
//! predicate evaluates false is skipped entirely and takes its default.
//!
//! ## Example
//!
//! ```rust
//! use stencil_prompts::{resolve, AnswerValue, Prompt, PromptKind, Sources};
//!
//! let prompts = vec![Prompt {
//!     id: "name".into(),
//!     env: "STENCIL_NAME".into(),
//!     kind: PromptKind::String,
//!     description: None,
//!     allowed: vec![],
//!     default: AnswerValue::Str("my_site".into()),
//!     depends_on: None,
//! }];
//!
//! let answers = resolve(&prompts, &mut Sources::empty()).unwrap();
//! assert_eq!(answers.string("name"), Some("my_site"));
//! ```

pub mod answers;
pub mod error;
pub mod model;
pub mod resolver;
pub mod sources;

pub use answers::{normalize_list, parse_delimited_list, AnswerValue, Answers};
pub use error::{ConfigError, PromptResult};
pub use model::{Condition, Prompt, PromptKind};
pub use resolver::resolve;
pub use sources::{ConfigDoc, PromptInput, Sources};
