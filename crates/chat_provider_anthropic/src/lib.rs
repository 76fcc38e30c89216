//! Anthropic-backed implementation of the shared `chat_provider` contract.
//!
//! This adapter flattens a conversation into the Messages wire format,
//! bridges the synchronous provider seam onto the async transport, and maps
//! transport failures to the single service-failure error the console
//! surfaces.

use std::sync::Arc;
use std::time::Duration;

use anthropic_api::{
    AnthropicApiClient, AnthropicApiConfig, AnthropicApiError, MessageParam, MessageRole,
    MessagesRequest, MessagesResponse,
};
use chat_provider::{
    ChatProvider, ChatRequest, ProviderError, ProviderInitError, ProviderProfile, Role,
};

/// Stable provider identifier used by console startup selection.
pub const ANTHROPIC_PROVIDER_ID: &str = "anthropic";

/// Model used when the configuration names none.
pub const DEFAULT_MODEL_ID: &str = "claude-sonnet-4-5";

/// Reply budget used when the configuration names none.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Runtime configuration for the Anthropic provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicProviderConfig {
    pub api_key: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub base_url: Option<String>,
    pub session_id: Option<String>,
    pub timeout: Option<Duration>,
}

impl AnthropicProviderConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: None,
            session_id: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_api_config(self) -> AnthropicApiConfig {
        let mut config = AnthropicApiConfig::new(self.api_key);

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait MessagesClient: Send + Sync {
    fn create(&self, request: &MessagesRequest) -> Result<MessagesResponse, AnthropicApiError>;
}

#[derive(Debug)]
struct DefaultMessagesClient {
    client: AnthropicApiClient,
}

impl MessagesClient for DefaultMessagesClient {
    fn create(&self, request: &MessagesRequest) -> Result<MessagesResponse, AnthropicApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                AnthropicApiError::Unknown(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(self.client.create_message(request))
    }
}

/// `ChatProvider` adapter backed by `anthropic_api` transport primitives.
pub struct AnthropicChatProvider {
    model_id: String,
    max_tokens: u32,
    session_id: Option<String>,
    messages_client: Arc<dyn MessagesClient>,
}

impl AnthropicChatProvider {
    /// Creates a provider using real Messages transport.
    pub fn new(config: AnthropicProviderConfig) -> Result<Self, ProviderInitError> {
        let model_id = sanitize_model_id(&config.model_id);
        let max_tokens = config.max_tokens.max(1);
        let session_id = config.session_id.clone();
        let messages_client = Arc::new(DefaultMessagesClient {
            client: AnthropicApiClient::new(config.into_api_config()).map_err(map_init_error)?,
        });

        Ok(Self {
            model_id,
            max_tokens,
            session_id,
            messages_client,
        })
    }

    fn build_request(&self, request: &ChatRequest) -> MessagesRequest {
        let mut messages: Vec<MessageParam> = request
            .turns
            .iter()
            .map(|turn| {
                MessageParam::new(
                    match turn.role {
                        Role::User => MessageRole::User,
                        Role::Assistant => MessageRole::Assistant,
                    },
                    turn.text.clone(),
                )
            })
            .collect();
        messages.push(MessageParam::new(
            MessageRole::User,
            request.message.clone(),
        ));

        let mut wire = MessagesRequest::new(self.model_id.clone(), self.max_tokens, messages);
        if let Some(session_id) = self.session_id.as_deref() {
            wire = wire.with_user_id(session_id);
        }

        wire
    }

    #[cfg(test)]
    fn with_messages_client_for_tests(
        model_id: impl Into<String>,
        messages_client: Arc<dyn MessagesClient>,
    ) -> Self {
        Self {
            model_id: sanitize_model_id(&model_id.into()),
            max_tokens: DEFAULT_MAX_TOKENS,
            session_id: Some("session-under-test".to_string()),
            messages_client,
        }
    }
}

impl ChatProvider for AnthropicChatProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: ANTHROPIC_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let wire = self.build_request(&request);

        match self.messages_client.create(&wire) {
            Ok(response) => Ok(response.text()),
            Err(error) => Err(ProviderError::new(format!(
                "Anthropic request failed: {error}"
            ))),
        }
    }
}

fn sanitize_model_id(model_id: &str) -> String {
    let trimmed = model_id.trim();
    if trimmed.is_empty() {
        DEFAULT_MODEL_ID.to_string()
    } else {
        trimmed.to_string()
    }
}

fn map_init_error(error: AnthropicApiError) -> ProviderInitError {
    ProviderInitError::new(format!("Failed to initialize anthropic provider: {error}"))
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use chat_provider::Turn;
    use serde_json::json;

    use super::*;

    enum FakeOutcome {
        Success(MessagesResponse),
        Error(AnthropicApiError),
    }

    struct FakeMessagesClient {
        observed_request: Mutex<Option<MessagesRequest>>,
        outcome: Mutex<Option<FakeOutcome>>,
    }

    impl FakeMessagesClient {
        fn success(response: MessagesResponse) -> Arc<Self> {
            Arc::new(Self {
                observed_request: Mutex::new(None),
                outcome: Mutex::new(Some(FakeOutcome::Success(response))),
            })
        }

        fn failure(error: AnthropicApiError) -> Arc<Self> {
            Arc::new(Self {
                observed_request: Mutex::new(None),
                outcome: Mutex::new(Some(FakeOutcome::Error(error))),
            })
        }

        fn observed_request(&self) -> Option<MessagesRequest> {
            lock_unpoisoned(&self.observed_request).clone()
        }
    }

    impl MessagesClient for FakeMessagesClient {
        fn create(&self, request: &MessagesRequest) -> Result<MessagesResponse, AnthropicApiError> {
            *lock_unpoisoned(&self.observed_request) = Some(request.clone());

            match lock_unpoisoned(&self.outcome).take() {
                Some(FakeOutcome::Success(response)) => Ok(response),
                Some(FakeOutcome::Error(error)) => Err(error),
                None => panic!("fake outcome should be consumed exactly once"),
            }
        }
    }

    fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn text_response(chunks: &[&str]) -> MessagesResponse {
        let blocks: Vec<_> = chunks
            .iter()
            .map(|chunk| json!({"type": "text", "text": chunk}))
            .collect();
        serde_json::from_value(json!({ "content": blocks })).expect("response fixture")
    }

    #[test]
    fn profile_reports_anthropic_provider_id_and_model() {
        let fake = FakeMessagesClient::success(text_response(&["ok"]));
        let provider = AnthropicChatProvider::with_messages_client_for_tests("claude-test", fake);

        let profile = provider.profile();
        assert_eq!(profile.provider_id, ANTHROPIC_PROVIDER_ID);
        assert_eq!(profile.model_id, "claude-test");
    }

    #[test]
    fn complete_flattens_history_and_appends_new_message() {
        let fake = FakeMessagesClient::success(text_response(&["reply"]));
        let provider = AnthropicChatProvider::with_messages_client_for_tests(
            "claude-test",
            Arc::clone(&fake) as Arc<dyn MessagesClient>,
        );

        let reply = provider
            .complete(ChatRequest::new(
                vec![Turn::user("first"), Turn::assistant("second")],
                "third",
            ))
            .expect("completion should succeed");
        assert_eq!(reply, "reply");

        let observed = fake.observed_request().expect("request should be observed");
        assert_eq!(observed.model, "claude-test");
        assert_eq!(
            observed.messages,
            vec![
                MessageParam::new(MessageRole::User, "first"),
                MessageParam::new(MessageRole::Assistant, "second"),
                MessageParam::new(MessageRole::User, "third"),
            ]
        );
        assert_eq!(
            observed
                .metadata
                .as_ref()
                .and_then(|metadata| metadata.user_id.as_deref()),
            Some("session-under-test")
        );
    }

    #[test]
    fn complete_joins_multiple_text_blocks() {
        let fake = FakeMessagesClient::success(text_response(&["part one", "part two"]));
        let provider = AnthropicChatProvider::with_messages_client_for_tests("claude-test", fake);

        let reply = provider
            .complete(ChatRequest::new(Vec::new(), "go"))
            .expect("completion should succeed");
        assert_eq!(reply, "part one\npart two");
    }

    #[test]
    fn complete_with_no_text_blocks_is_an_empty_reply() {
        let fake = FakeMessagesClient::success(text_response(&[]));
        let provider = AnthropicChatProvider::with_messages_client_for_tests("claude-test", fake);

        let reply = provider
            .complete(ChatRequest::new(Vec::new(), "go"))
            .expect("empty reply is not an error");
        assert_eq!(reply, "");
    }

    #[test]
    fn transport_error_surfaces_as_provider_error() {
        let fake = FakeMessagesClient::failure(AnthropicApiError::MissingApiKey);
        let provider = AnthropicChatProvider::with_messages_client_for_tests("claude-test", fake);

        let error = provider
            .complete(ChatRequest::new(Vec::new(), "go"))
            .expect_err("transport failure must surface");
        assert!(error.message().contains("Anthropic request failed"));
    }

    #[test]
    fn blank_model_id_falls_back_to_default() {
        let fake = FakeMessagesClient::success(text_response(&["ok"]));
        let provider = AnthropicChatProvider::with_messages_client_for_tests("   ", fake);

        assert_eq!(provider.profile().model_id, DEFAULT_MODEL_ID);
    }
}
