use std::time::Duration;

use crate::url::DEFAULT_ANTHROPIC_BASE_URL;

/// Messages API protocol version carried on every request.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Transport configuration for Anthropic Messages requests.
#[derive(Debug, Clone)]
pub struct AnthropicApiConfig {
    /// API key passed in the `x-api-key` header.
    pub api_key: String,
    /// Base URL for Messages endpoints.
    pub base_url: String,
    /// Protocol version for the `anthropic-version` header.
    pub api_version: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl Default for AnthropicApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl AnthropicApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
