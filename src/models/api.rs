//! Wire dialect tags.
//!
//! An [`Api`] labels which request/response protocol a provider speaks. It is
//! persisted as a plain string (`"openai-completions"`, `"anthropic-messages"`,
//! ...) and any tag we don't know about is carried through untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wire protocol family spoken by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Api {
    /// OpenAI-style chat completions (also used by Ollama, vLLM, LM Studio, ...)
    #[default]
    OpenaiCompletions,
    /// OpenAI Responses API
    OpenaiResponses,
    /// Azure-hosted OpenAI Responses API
    AzureOpenaiResponses,
    /// Anthropic Messages API
    AnthropicMessages,
    /// Google Generative AI (Gemini) API
    GoogleGenerativeAi,
    /// Gemini CLI backend
    GoogleGeminiCli,
    /// Google Vertex AI
    GoogleVertex,
    /// AWS Bedrock ConverseStream
    BedrockConverseStream,
    /// Any other tag, kept verbatim
    Custom(String),
}

impl Api {
    /// Interpret a user-supplied tag.
    ///
    /// Returns `None` for the empty string and the literal `"undefined"`, so
    /// the caller falls back to the default dialect. Anything else, including
    /// `"null"` and whitespace, is an explicit tag and is kept verbatim.
    pub fn from_explicit(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw == "undefined" {
            return None;
        }
        raw.parse().ok()
    }

    /// The tag as written to `models.json`.
    pub fn as_str(&self) -> &str {
        match self {
            Api::OpenaiCompletions => "openai-completions",
            Api::OpenaiResponses => "openai-responses",
            Api::AzureOpenaiResponses => "azure-openai-responses",
            Api::AnthropicMessages => "anthropic-messages",
            Api::GoogleGenerativeAi => "google-generative-ai",
            Api::GoogleGeminiCli => "google-gemini-cli",
            Api::GoogleVertex => "google-vertex",
            Api::BedrockConverseStream => "bedrock-converse-stream",
            Api::Custom(tag) => tag,
        }
    }

    /// Check if this is a tag without a dedicated variant.
    pub fn is_custom(&self) -> bool {
        matches!(self, Api::Custom(_))
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Api {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai-completions" => Ok(Api::OpenaiCompletions),
            "openai-responses" => Ok(Api::OpenaiResponses),
            "azure-openai-responses" => Ok(Api::AzureOpenaiResponses),
            "anthropic-messages" => Ok(Api::AnthropicMessages),
            "google-generative-ai" => Ok(Api::GoogleGenerativeAi),
            "google-gemini-cli" => Ok(Api::GoogleGeminiCli),
            "google-vertex" => Ok(Api::GoogleVertex),
            "bedrock-converse-stream" => Ok(Api::BedrockConverseStream),
            "" => Err("api identifier cannot be empty".to_string()),
            other => Ok(Api::Custom(other.to_string())),
        }
    }
}

impl Serialize for Api {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Api {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserialize an optional `api` field. `null`, `""` and `"undefined"` map to
/// `None`.
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Api>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Api::from_explicit))
}
