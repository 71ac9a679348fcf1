//! Provider configuration and models.json materialization.
//!
//! This module handles:
//! - Wire dialect tags (`Api`)
//! - User config and persisted artifact types
//! - Defaulting, merging, and writing `models.json`

pub mod api;
pub mod config;
pub mod materialize;

pub use api::Api;
pub use config::{
    MergeMode, ModelDefinition, ModelsArtifact, ModelsConfig, ModelsConfigError, ProviderConfig,
    ResolvedProvider, RootConfig,
};
pub use materialize::{
    build_artifact, ensure_models_json, ensure_models_json_in, load_models_json,
    models_json_path, render_artifact, resolve_provider, EnsureOutcome, MODELS_FILE_NAME,
};
