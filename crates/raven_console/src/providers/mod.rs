use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chat_provider::ChatProvider;
use chat_provider_anthropic::{
    AnthropicChatProvider, AnthropicProviderConfig, ANTHROPIC_PROVIDER_ID,
};
use chat_provider_mock::{MockChatProvider, MOCK_PROVIDER_ID};
use serde::Deserialize;

pub const PROVIDER_ENV_VAR: &str = "RAVEN_PROVIDER";
pub const DEFAULT_PROVIDER_ID: &str = MOCK_PROVIDER_ID;
pub const ANTHROPIC_CONFIG_PATH_ENV_VAR: &str = "RAVEN_ANTHROPIC_CONFIG_PATH";
pub const ANTHROPIC_API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// On-disk provider configuration, pointed at by
/// `RAVEN_ANTHROPIC_CONFIG_PATH`. Unknown fields are rejected so a typo
/// fails loudly instead of silently running with defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnthropicFileConfig {
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    timeout_sec: Option<u64>,
}

pub fn provider_from_env(session_id: Option<&str>) -> Result<Arc<dyn ChatProvider>, String> {
    let provider_id = std::env::var(PROVIDER_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    provider_for_id(
        provider_id.as_deref().unwrap_or(DEFAULT_PROVIDER_ID),
        session_id,
    )
}

pub fn provider_for_id(
    provider_id: &str,
    session_id: Option<&str>,
) -> Result<Arc<dyn ChatProvider>, String> {
    match provider_id {
        MOCK_PROVIDER_ID => Ok(Arc::new(MockChatProvider::default())),
        ANTHROPIC_PROVIDER_ID => anthropic_provider_from_env(session_id),
        unknown => Err(format!(
            "Unsupported provider '{unknown}'. Available providers: {MOCK_PROVIDER_ID}, {ANTHROPIC_PROVIDER_ID}"
        )),
    }
}

fn anthropic_provider_from_env(session_id: Option<&str>) -> Result<Arc<dyn ChatProvider>, String> {
    let file_config = match std::env::var(ANTHROPIC_CONFIG_PATH_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => load_file_config(path.trim())?,
        _ => AnthropicFileConfig::default(),
    };

    let fallback_key = std::env::var(ANTHROPIC_API_KEY_ENV_VAR).ok();
    let config = provider_config_from_parts(file_config, fallback_key, session_id)?;

    AnthropicChatProvider::new(config)
        .map(|provider| Arc::new(provider) as Arc<dyn ChatProvider>)
        .map_err(|error| error.to_string())
}

fn load_file_config(path: &str) -> Result<AnthropicFileConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("Failed to read anthropic config {path}: {error}"))?;
    serde_json::from_str(&raw)
        .map_err(|error| format!("Invalid anthropic config {path}: {error}"))
}

fn provider_config_from_parts(
    file_config: AnthropicFileConfig,
    fallback_key: Option<String>,
    session_id: Option<&str>,
) -> Result<AnthropicProviderConfig, String> {
    let api_key = file_config
        .api_key
        .or(fallback_key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            format!(
                "Anthropic provider needs an API key: set {ANTHROPIC_API_KEY_ENV_VAR} or put \
                 'api_key' in the config file"
            )
        })?;

    let mut config = AnthropicProviderConfig::new(api_key);

    if let Some(model) = file_config.model {
        let model = model.trim().to_string();
        if model.is_empty() {
            return Err("Anthropic config 'model' must be non-empty when provided".to_string());
        }
        config = config.with_model_id(model);
    }

    if let Some(max_tokens) = file_config.max_tokens {
        if max_tokens == 0 {
            return Err("Anthropic config 'max_tokens' must be > 0".to_string());
        }
        config = config.with_max_tokens(max_tokens);
    }

    if let Some(timeout_sec) = file_config.timeout_sec {
        if timeout_sec == 0 {
            return Err("Anthropic config 'timeout_sec' must be > 0".to_string());
        }
        config = config.with_timeout(Duration::from_secs(timeout_sec));
    }

    if let Some(session_id) = session_id {
        config = config.with_session_id(session_id);
    }

    Ok(config)
}
