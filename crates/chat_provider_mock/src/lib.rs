//! Deterministic mock implementation of the shared `chat_provider` contract.
//!
//! This crate contains no transport/protocol logic and is intended for local
//! development and contract-level integration testing.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chat_provider::{ChatProvider, ChatRequest, ProviderError, ProviderProfile};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

const DEFAULT_REPLY: &str =
    "Mocked reply. Set RAVEN_PROVIDER=anthropic for a real model connection.";

/// Scripted provider: replies are consumed in order, then the default reply
/// repeats. Requests are recorded so tests can assert the flattened history.
#[derive(Debug)]
pub struct MockChatProvider {
    scripted_replies: Mutex<VecDeque<String>>,
    default_reply: String,
    fail_with: Option<String>,
    observed_requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatProvider {
    #[must_use]
    pub fn new(scripted_replies: Vec<String>) -> Self {
        Self {
            scripted_replies: Mutex::new(scripted_replies.into()),
            default_reply: DEFAULT_REPLY.to_string(),
            fail_with: None,
            observed_requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every completion fails with `message`, for
    /// exercising service-failure paths.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            scripted_replies: Mutex::new(VecDeque::new()),
            default_reply: DEFAULT_REPLY.to_string(),
            fail_with: Some(message.into()),
            observed_requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_default_reply(mut self, default_reply: impl Into<String>) -> Self {
        self.default_reply = default_reply.into();
        self
    }

    /// Requests observed so far, in call order.
    #[must_use]
    pub fn observed_requests(&self) -> Vec<ChatRequest> {
        lock_unpoisoned(&self.observed_requests).clone()
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ChatProvider for MockChatProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: "mock".to_string(),
        }
    }

    fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        lock_unpoisoned(&self.observed_requests).push(request);

        if let Some(message) = &self.fail_with {
            return Err(ProviderError::new(message.clone()));
        }

        let reply = lock_unpoisoned(&self.scripted_replies)
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        Ok(reply)
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
