//! Environment-driven configuration.
//!
//! Every config struct has a `from_env` constructor and a `from_lookup`
//! variant taking a key lookup function, so parsing can be exercised without
//! touching the process environment. Empty values count as unset.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Error;

/// Default Jira custom field holding story point estimates.
pub const DEFAULT_STORY_POINTS_FIELD: &str = "customfield_10016";

/// Default project key when `JIRA_PROJECT_KEY` is unset. The project and
/// board are run arguments, read by the CLI, not part of [`JiraConfig`].
pub const DEFAULT_PROJECT_KEY: &str = "PROJ";

fn lookup_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Jira connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraConfig {
    /// Jira base URL (e.g., "https://example.atlassian.net")
    pub base_url: String,
    /// Account used for basic auth
    pub username: String,
    /// API token paired with `username`
    pub api_token: String,
    /// Custom field id holding story points
    pub story_points_field: String,
}

impl JiraConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url = non_empty(&lookup, "JIRA_URL");
        let username = non_empty(&lookup, "JIRA_USERNAME");
        let api_token = non_empty(&lookup, "JIRA_API_TOKEN");

        let (base_url, username, api_token) = match (base_url, username, api_token) {
            (Some(url), Some(user), Some(token)) => (url, user, token),
            (url, user, token) => {
                let missing: Vec<&str> = [
                    ("JIRA_URL", url.is_none()),
                    ("JIRA_USERNAME", user.is_none()),
                    ("JIRA_API_TOKEN", token.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(Error::ConfigurationMissing(format!(
                    "Jira credentials not configured, set {}",
                    missing.join(", ")
                )));
            }
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            api_token,
            story_points_field: non_empty(&lookup, "JIRA_STORY_POINTS_FIELD")
                .unwrap_or_else(|| DEFAULT_STORY_POINTS_FIELD.into()),
        })
    }
}

/// Teams webhook and Microsoft Graph settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamsConfig {
    /// Teams incoming webhook URL
    pub webhook_url: Option<String>,
    /// Bearer token for the Graph send-mail API
    pub graph_token: Option<String>,
    /// Mailbox the Graph message is sent from
    pub sender_email: Option<String>,
}

impl TeamsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            webhook_url: non_empty(&lookup, "TEAMS_WEBHOOK_URL"),
            graph_token: non_empty(&lookup, "MICROSOFT_GRAPH_API_TOKEN"),
            sender_email: non_empty(&lookup, "MICROSOFT_GRAPH_SENDER_EMAIL"),
        }
    }
}

/// Language model backend used to phrase the report narrative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
}

impl LlmProvider {
    /// Parse a provider name, falling back to OpenAI for anything unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "openai" | "" => Self::OpenAi,
            "anthropic" => Self::Anthropic,
            "ollama" => Self::Ollama,
            other => {
                warn!(provider = %other, "Unknown LLM provider, using openai");
                Self::OpenAi
            }
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => f.write_str("openai"),
            Self::Anthropic => f.write_str("anthropic"),
            Self::Ollama => f.write_str("ollama"),
        }
    }
}

/// Narrative backend settings handed to the orchestrator.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider = non_empty(&lookup, "LLM_PROVIDER")
            .map(|p| LlmProvider::parse(&p))
            .unwrap_or_default();

        match provider {
            LlmProvider::Ollama => {
                let model =
                    non_empty(&lookup, "OLLAMA_MODEL").unwrap_or_else(|| "llama3.2".into());
                Self {
                    provider,
                    model: format!("ollama/{model}"),
                    api_key: None,
                    base_url: Some(
                        non_empty(&lookup, "OLLAMA_BASE_URL")
                            .unwrap_or_else(|| "http://localhost:11434".into()),
                    ),
                }
            }
            LlmProvider::Anthropic => Self {
                provider,
                model: non_empty(&lookup, "ANTHROPIC_MODEL")
                    .unwrap_or_else(|| "claude-3-opus-20240229".into()),
                api_key: non_empty(&lookup, "ANTHROPIC_API_KEY"),
                base_url: None,
            },
            LlmProvider::OpenAi => Self {
                provider,
                model: non_empty(&lookup, "MODEL").unwrap_or_else(|| "gpt-4o".into()),
                api_key: non_empty(&lookup, "OPENAI_API_KEY"),
                base_url: None,
            },
        }
    }
}
