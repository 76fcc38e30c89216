//! Transport-only Anthropic Messages API client primitives.
//!
//! This crate owns request building, response parsing, and error-envelope
//! handling for the Messages endpoint only. It intentionally contains no
//! provider-selection code and no console coupling, and it performs exactly
//! one HTTP attempt per call. Retry policy is a caller concern this system
//! deliberately does not have.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::AnthropicApiClient;
pub use config::{AnthropicApiConfig, DEFAULT_API_VERSION};
pub use error::AnthropicApiError;
pub use payload::{ContentBlock, MessageParam, MessageRole, MessagesRequest, MessagesResponse};
pub use url::{normalize_messages_url, DEFAULT_ANTHROPIC_BASE_URL};
