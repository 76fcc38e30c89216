use std::collections::BTreeMap;

use crate::config::AnthropicApiConfig;
use crate::error::AnthropicApiError;

pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_API_VERSION: &str = "anthropic-version";
pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for Messages transport requests.
pub fn build_headers(
    config: &AnthropicApiConfig,
) -> Result<BTreeMap<String, String>, AnthropicApiError> {
    if config.api_key.trim().is_empty() {
        return Err(AnthropicApiError::MissingApiKey);
    }

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_API_KEY.to_owned(), config.api_key.trim().to_owned());
    headers.insert(
        HEADER_API_VERSION.to_owned(),
        config.api_version.trim().to_owned(),
    );
    headers.insert(HEADER_ACCEPT.to_owned(), "application/json".to_owned());
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );

    let user_agent = match config.user_agent.as_deref() {
        Some(explicit) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        _ => default_user_agent(),
    };
    headers.insert(HEADER_USER_AGENT.to_owned(), user_agent);

    Ok(headers)
}

fn default_user_agent() -> String {
    format!("raven/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::{build_headers, HEADER_API_KEY, HEADER_API_VERSION, HEADER_USER_AGENT};
    use crate::config::AnthropicApiConfig;
    use crate::error::AnthropicApiError;

    #[test]
    fn header_map_contains_messages_headers() {
        let config = AnthropicApiConfig::new("secret-key");
        let headers = build_headers(&config).expect("header construction");

        assert_eq!(
            headers.get(HEADER_API_KEY).expect("api key header"),
            &"secret-key".to_owned()
        );
        assert_eq!(
            headers.get(HEADER_API_VERSION).expect("version header"),
            &"2023-06-01".to_owned()
        );
        assert_eq!(
            headers.get("content-type").expect("content-type"),
            &"application/json".to_owned()
        );
        assert_eq!(
            headers.get("accept").expect("accept"),
            &"application/json".to_owned()
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let config = AnthropicApiConfig::new("   ");
        let error = build_headers(&config).expect_err("blank key must be rejected");
        assert!(matches!(error, AnthropicApiError::MissingApiKey));
    }

    #[test]
    fn user_agent_override_wins_over_default() {
        let config = AnthropicApiConfig::new("secret-key").with_user_agent("test-agent");
        let headers = build_headers(&config).expect("header construction");
        assert_eq!(
            headers.get(HEADER_USER_AGENT).expect("user-agent"),
            &"test-agent".to_owned()
        );
    }
}
