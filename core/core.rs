pub mod classify;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod gather;
pub mod rules;
pub mod selection;
pub mod tree;

pub use classify::{EntryKind, PathClassifier, Verdict};
pub use config::Config;
pub use content::ContentRenderer;
pub use context::{AssemblyOptions, ContextGenerator, RenderedArtifact, assemble};
pub use error::{AppError, Result};
pub use rules::{IgnoreRules, RuleSet};
pub use selection::{Mode, SelectionRoot};
pub use tree::TreeRenderer;
