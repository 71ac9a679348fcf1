//! Provider configuration types.
//!
//! This module provides:
//! - `RootConfig` / `ModelsConfig` / `ProviderConfig`: the user-supplied input,
//!   where most provider fields may be missing
//! - `ModelsArtifact` / `ResolvedProvider`: the persisted `models.json` shape,
//!   where every provider carries a concrete `api`
//! - `ModelDefinition`: per-model descriptors, passed through as-is
//! - `ModelsConfigError`: everything that can go wrong along the way

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::api::{self, Api};

/// Errors that can occur while materializing model configuration.
#[derive(Debug, Error)]
pub enum ModelsConfigError {
    #[error("Provider '{provider}' is missing required field '{field}'")]
    Validation {
        provider: String,
        field: &'static str,
    },
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize models.json: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Home directory not found")]
    HomeDirNotFound,
}

impl ModelsConfigError {
    pub(crate) fn missing_field(provider: &str, field: &'static str) -> Self {
        Self::Validation {
            provider: provider.to_string(),
            field,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How previously persisted providers are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// The input config is authoritative; providers only on disk are dropped
    #[default]
    Replace,
    /// Providers only on disk are kept; input entries win on name clashes
    Merge,
}

/// A model served by a provider.
///
/// Only `id` is interpreted. Every other key (`name`, `cost`, `contextWindow`,
/// ...) is kept as the JSON value the user wrote, so partial objects, unknown
/// keys and integer-vs-float literals all survive into `models.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ModelDefinition {
    /// Create a model descriptor with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Get a descriptor field by its JSON key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A provider entry as the user wrote it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "api::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub api: Option<Api>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<ModelDefinition>>,
    /// Provider-level keys we don't model (headers, authHeader, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderConfig {
    /// Create a provider entry with the two required fields set.
    pub fn new(base_url: impl Into<String>, models: Vec<ModelDefinition>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            models: Some(models),
            ..Default::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the wire dialect explicitly.
    pub fn with_api(mut self, api: Api) -> Self {
        self.api = Some(api);
        self
    }
}

/// The `models` section of the user config.
///
/// The persisted artifact has the same outer shape (`{ "providers": ... }`),
/// so this type also reads an existing `models.json` back in merge mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MergeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<IndexMap<String, ProviderConfig>>,
}

impl ModelsConfig {
    /// Add a provider entry. A new name goes last; an existing one keeps its slot.
    pub fn add_provider(&mut self, name: impl Into<String>, provider: ProviderConfig) {
        self.providers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), provider);
    }
}

/// Top-level application config. Only the `models` section matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelsConfig>,
}

impl RootConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, ModelsConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ModelsConfigError::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| ModelsConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge mode requested by the config (replace when unset).
    pub fn merge_mode(&self) -> MergeMode {
        self.models
            .as_ref()
            .and_then(|m| m.mode)
            .unwrap_or_default()
    }

    /// Provider entries in the order they were written, empty when the section
    /// is missing.
    pub fn providers(&self) -> impl Iterator<Item = (&String, &ProviderConfig)> {
        self.models
            .iter()
            .filter_map(|m| m.providers.as_ref())
            .flat_map(|p| p.iter())
    }
}

/// A provider entry as persisted: `api` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProvider {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api: Api,
    pub models: Vec<ModelDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Contents of `models.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelsArtifact {
    #[serde(default)]
    pub providers: IndexMap<String, ResolvedProvider>,
}

impl ModelsArtifact {
    /// Get a provider by name.
    pub fn get(&self, name: &str) -> Option<&ResolvedProvider> {
        self.providers.get(name)
    }

    /// Provider names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(|s| s.as_str())
    }

    /// True when no provider is configured.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn llama3() -> Value {
        json!({
            "id": "llama3",
            "name": "Llama 3",
            "reasoning": false,
            "input": ["text"],
            "cost": { "input": 0, "output": 0, "cacheRead": 0, "cacheWrite": 0 },
            "contextWindow": 128000,
            "maxTokens": 8192
        })
    }

    #[test]
    fn test_root_config_parses_camel_case() {
        let raw = json!({
            "models": {
                "providers": {
                    "ollama": {
                        "baseUrl": "http://127.0.0.1:11434/v1",
                        "apiKey": "ollama",
                        "models": [llama3()]
                    }
                }
            }
        });

        let config: RootConfig = serde_json::from_value(raw).unwrap();
        let providers: Vec<_> = config.providers().collect();
        assert_eq!(providers.len(), 1);

        let (name, ollama) = providers[0];
        assert_eq!(name, "ollama");
        assert_eq!(ollama.base_url.as_deref(), Some("http://127.0.0.1:11434/v1"));
        assert_eq!(ollama.api_key.as_deref(), Some("ollama"));
        assert_eq!(ollama.api, None);

        let model = &ollama.models.as_ref().unwrap()[0];
        assert_eq!(model.id, "llama3");
        assert_eq!(model.get("contextWindow"), Some(&json!(128000)));
        assert_eq!(model.get("maxTokens"), Some(&json!(8192)));
        assert_eq!(
            model.get("cost"),
            Some(&json!({ "input": 0, "output": 0, "cacheRead": 0, "cacheWrite": 0 }))
        );
        assert!(model.get("id").is_none());
    }

    #[test]
    fn test_providers_keep_written_order() {
        let config: RootConfig = serde_json::from_str(
            r#"{ "models": { "providers": {
                "zeta": { "baseUrl": "http://z/v1", "models": [] },
                "alpha": { "baseUrl": "http://a/v1", "models": [] },
                "mid": { "baseUrl": "http://m/v1", "models": [] }
            } } }"#,
        )
        .unwrap();

        let names: Vec<_> = config.providers().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_root_config_ignores_unrelated_sections() {
        let raw = json!({
            "agents": { "defaults": { "model": "ollama/llama3" } },
            "gateway": { "port": 18789 }
        });
        let config: RootConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.models, None);
        assert_eq!(config.providers().count(), 0);
        assert_eq!(config.merge_mode(), MergeMode::Replace);
    }

    #[test]
    fn test_merge_mode_parses_lowercase() {
        let config: RootConfig =
            serde_json::from_value(json!({ "models": { "mode": "merge" } })).unwrap();
        assert_eq!(config.merge_mode(), MergeMode::Merge);

        let result: Result<RootConfig, _> =
            serde_json::from_value(json!({ "models": { "mode": "Merge" } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_extra_keys_survive_round_trip() {
        let raw = json!({
            "baseUrl": "https://gateway.example.com/v1",
            "authHeader": true,
            "headers": { "X-Team": "infra" },
            "models": []
        });
        let provider: ProviderConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(provider.extra.get("authHeader"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&provider).unwrap(), raw);
    }

    #[test]
    fn test_model_definition_keeps_absent_fields_absent() {
        let model: ModelDefinition =
            serde_json::from_value(json!({ "id": "bare", "compat": { "supportsStore": false } }))
                .unwrap();
        let back = serde_json::to_value(&model).unwrap();
        assert_eq!(back, json!({ "id": "bare", "compat": { "supportsStore": false } }));
    }

    #[test]
    fn test_model_definition_keeps_partial_cost_and_unknown_keys() {
        let raw = r#"{"id":"m","cost":{"input":3,"tieredInput":[1,2]}}"#;
        let model: ModelDefinition = serde_json::from_str(raw).unwrap();

        assert_eq!(model.get("cost"), Some(&json!({ "input": 3, "tieredInput": [1, 2] })));
        assert_eq!(serde_json::to_string(&model).unwrap(), raw);
    }

    #[test]
    fn test_model_definition_accepts_any_json_for_known_keys() {
        let raw = r#"{"id":"m","contextWindow":131072.0,"maxTokens":"8k","reasoning":"high","input":"text"}"#;
        let model: ModelDefinition = serde_json::from_str(raw).unwrap();

        assert_eq!(model.get("contextWindow").and_then(Value::as_f64), Some(131072.0));
        assert_eq!(model.get("reasoning"), Some(&json!("high")));
        assert_eq!(serde_json::to_string(&model).unwrap(), raw);
    }

    #[test]
    fn test_model_definition_requires_id() {
        let result: Result<ModelDefinition, _> = serde_json::from_value(json!({ "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_provider_creates_map() {
        let mut models = ModelsConfig::default();
        assert!(models.providers.is_none());

        models.add_provider("local", ProviderConfig::new("http://localhost:8080/v1", vec![]));
        assert!(models.providers.as_ref().unwrap().contains_key("local"));
    }

    #[test]
    fn test_add_provider_appends_and_replaces_in_place() {
        let mut models = ModelsConfig::default();
        models.add_provider("zeta", ProviderConfig::new("http://z/v1", vec![]));
        models.add_provider("alpha", ProviderConfig::new("http://a/v1", vec![]));
        models.add_provider("zeta", ProviderConfig::new("http://z2/v1", vec![]));

        let providers = models.providers.as_ref().unwrap();
        assert_eq!(providers.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(providers["zeta"].base_url.as_deref(), Some("http://z2/v1"));
    }

    #[test]
    fn test_provider_builder_chain() {
        let provider = ProviderConfig::new("http://localhost:8080/v1", vec![ModelDefinition::new("m")])
            .with_api_key("test-key")
            .with_api(Api::AnthropicMessages);

        assert_eq!(provider.api_key.as_deref(), Some("test-key"));
        assert_eq!(provider.api, Some(Api::AnthropicMessages));
        assert_eq!(provider.models.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_load_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "models": { "providers": { "p": { "baseUrl": "u", "models": [] } } } }"#,
        )
        .unwrap();

        let config = RootConfig::load_from_path(&path).unwrap();
        assert_eq!(config.providers().count(), 1);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.json");

        let err = RootConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ModelsConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_from_path_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = RootConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ModelsConfigError::Parse { .. }));
    }

    #[test]
    fn test_resolved_provider_requires_api() {
        let result: Result<ResolvedProvider, _> =
            serde_json::from_value(json!({ "baseUrl": "u", "models": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_error_message() {
        let err = ModelsConfigError::missing_field("ollama", "baseUrl");
        assert_eq!(
            err.to_string(),
            "Provider 'ollama' is missing required field 'baseUrl'"
        );
    }
}
