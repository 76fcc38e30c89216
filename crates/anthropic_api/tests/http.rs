use anthropic_api::headers::{HEADER_API_KEY, HEADER_API_VERSION};
use anthropic_api::{
    normalize_messages_url, AnthropicApiClient, AnthropicApiConfig, AnthropicApiError,
    MessageParam, MessageRole, MessagesRequest,
};

#[test]
fn http_request_builds_messages_endpoint() {
    let config = AnthropicApiConfig::new("secret-key").with_base_url("https://api.anthropic.com");
    let client = AnthropicApiClient::new(config).expect("client");
    let request = MessagesRequest::new(
        "claude-sonnet-4-5",
        2048,
        vec![MessageParam::new(MessageRole::User, "payload")],
    );

    let http_request = client
        .build_request(&request)
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(
        http_request.url().as_str(),
        normalize_messages_url("https://api.anthropic.com")
    );
    assert_eq!(http_request.method(), "POST");
    assert_eq!(
        http_request
            .headers()
            .get(HEADER_API_KEY)
            .expect("api key header"),
        "secret-key"
    );
    assert_eq!(
        http_request
            .headers()
            .get(HEADER_API_VERSION)
            .expect("version header"),
        "2023-06-01"
    );
}

#[test]
fn client_with_blank_key_fails_at_request_build() {
    let client = AnthropicApiClient::new(AnthropicApiConfig::new("")).expect("client");
    let request = MessagesRequest::new("model", 16, Vec::new());

    let error = client
        .build_request(&request)
        .expect_err("blank key must be rejected before any network use");
    assert!(matches!(error, AnthropicApiError::MissingApiKey));
}
