//! Materialize `models.json` from the user config.
//!
//! Every provider written to disk carries a concrete `api`. Explicit values
//! are kept verbatim; missing ones get [`Api::default`]. The artifact is
//! recomputed from the input on every call and only rewritten when its
//! rendered bytes change.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::api::Api;
use super::config::{
    MergeMode, ModelsArtifact, ModelsConfig, ModelsConfigError, ProviderConfig, ResolvedProvider,
    RootConfig,
};
use crate::config::resolve_agent_dir;

/// File name of the artifact inside the agent directory.
pub const MODELS_FILE_NAME: &str = "models.json";

/// Result of [`ensure_models_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureOutcome {
    /// Full path of the artifact
    pub path: PathBuf,
    /// False when the existing file already had the same contents
    pub wrote: bool,
}

/// Path of the artifact for an agent directory.
pub fn models_json_path(agent_dir: &Path) -> PathBuf {
    agent_dir.join(MODELS_FILE_NAME)
}

/// Fill in the defaults for a single provider.
pub fn resolve_provider(
    name: &str,
    provider: &ProviderConfig,
) -> Result<ResolvedProvider, ModelsConfigError> {
    let base_url = provider
        .base_url
        .as_ref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ModelsConfigError::missing_field(name, "baseUrl"))?;

    let models = provider
        .models
        .as_ref()
        .ok_or_else(|| ModelsConfigError::missing_field(name, "models"))?;

    // Builders can hand us a `Custom("")` or `Custom("undefined")` directly
    let explicit = provider
        .api
        .as_ref()
        .and_then(|api| Api::from_explicit(api.as_str()));

    let api = match explicit {
        Some(api) => {
            if api.is_custom() {
                tracing::debug!(provider = %name, api = %api, "Keeping unrecognized provider api");
            }
            api
        }
        None => {
            let api = Api::default();
            tracing::debug!(provider = %name, api = %api, "Provider api not set, using default");
            api
        }
    };

    Ok(ResolvedProvider {
        base_url: base_url.clone(),
        api_key: provider.api_key.clone(),
        api,
        models: models.clone(),
        extra: provider.extra.clone(),
    })
}

/// Compute the artifact for a config.
///
/// Providers keep the order they were written in. `existing` is the
/// previously persisted artifact, consulted only in [`MergeMode::Merge`],
/// where its providers missing from the input follow the input ones.
pub fn build_artifact(
    config: &RootConfig,
    existing: Option<&ModelsConfig>,
) -> Result<ModelsArtifact, ModelsConfigError> {
    let mut entries: IndexMap<&str, &ProviderConfig> = config
        .providers()
        .map(|(name, provider)| (name.as_str(), provider))
        .collect();

    if config.merge_mode() == MergeMode::Merge {
        if let Some(previous) = existing.and_then(|e| e.providers.as_ref()) {
            for (name, provider) in previous {
                entries.entry(name.as_str()).or_insert(provider);
            }
        }
    }

    let mut providers = IndexMap::with_capacity(entries.len());
    for (name, provider) in entries {
        providers.insert(name.to_string(), resolve_provider(name, provider)?);
    }

    Ok(ModelsArtifact { providers })
}

/// Render an artifact the way it is stored on disk.
pub fn render_artifact(artifact: &ModelsArtifact) -> Result<String, ModelsConfigError> {
    let mut content = serde_json::to_string_pretty(artifact)?;
    content.push('\n');
    Ok(content)
}

/// Materialize `models.json` in the resolved agent directory.
pub fn ensure_models_json(config: &RootConfig) -> Result<EnsureOutcome, ModelsConfigError> {
    let agent_dir = resolve_agent_dir()?;
    ensure_models_json_in(config, &agent_dir)
}

/// Materialize `models.json` in a specific agent directory.
///
/// The directory is created if needed. Nothing is written if validation
/// fails.
pub fn ensure_models_json_in(
    config: &RootConfig,
    agent_dir: &Path,
) -> Result<EnsureOutcome, ModelsConfigError> {
    let path = models_json_path(agent_dir);
    let previous = read_existing(&path)?;

    let existing = match (&previous, config.merge_mode()) {
        (Some(raw), MergeMode::Merge) => {
            let parsed: ModelsConfig =
                serde_json::from_str(raw).map_err(|source| ModelsConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            Some(parsed)
        }
        _ => None,
    };

    let artifact = build_artifact(config, existing.as_ref())?;
    let content = render_artifact(&artifact)?;

    if previous.as_deref() == Some(content.as_str()) {
        tracing::debug!(path = %path.display(), "models.json unchanged");
        return Ok(EnsureOutcome { path, wrote: false });
    }

    fs::create_dir_all(agent_dir).map_err(|e| ModelsConfigError::io(agent_dir, e))?;
    write_replacing(&path, &content)?;

    tracing::info!(
        path = %path.display(),
        providers = artifact.len(),
        "Wrote models.json"
    );

    Ok(EnsureOutcome { path, wrote: true })
}

/// Load a persisted artifact.
pub fn load_models_json(path: &Path) -> Result<ModelsArtifact, ModelsConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ModelsConfigError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| ModelsConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_existing(path: &Path) -> Result<Option<String>, ModelsConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ModelsConfigError::io(path, e)),
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_replacing(path: &Path, content: &str) -> Result<(), ModelsConfigError> {
    let tmp = path.with_extension("json.tmp");
    if let Err(e) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(ModelsConfigError::io(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ModelsConfigError::io(path, e)
    })
}
