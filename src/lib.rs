//! Ladle Library
//!
//! Turns a user's provider configuration into a complete `models.json` that
//! request dispatch can read without guessing.
//!
//! ## Main Components
//!
//! - [`models`] - Provider config types, dialect tags, and materialization
//! - [`config`] - Agent directory resolution
//!
//! ## Quick Start
//!
//! ```no_run
//! use ladle::{ensure_models_json, RootConfig};
//!
//! let config = RootConfig::load_from_path("ladle.json".as_ref())?;
//! let outcome = ensure_models_json(&config)?;
//! println!("{}", outcome.path.display());
//! # Ok::<(), ladle::ModelsConfigError>(())
//! ```

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{resolve_agent_dir, AGENT_DIR_ENV, STATE_DIR_ENV};
pub use models::{
    ensure_models_json, ensure_models_json_in, load_models_json, Api, EnsureOutcome, MergeMode,
    ModelDefinition, ModelsArtifact, ModelsConfig, ModelsConfigError, ProviderConfig,
    ResolvedProvider, RootConfig, MODELS_FILE_NAME,
};
