//! Interactive console wiring for raven.
//!
//! ## Provider bootstrap
//!
//! `raven_console` selects a provider at startup:
//!
//! - `RAVEN_PROVIDER=mock` (default) for deterministic local runs
//! - `RAVEN_PROVIDER=anthropic` for the Anthropic Messages transport
//!
//! When `RAVEN_PROVIDER=anthropic`, the API key comes from
//! `ANTHROPIC_API_KEY`, or set `RAVEN_ANTHROPIC_CONFIG_PATH` to a readable
//! UTF-8 JSON file with this shape:
//!
//! ```json
//! {
//!   "api_key": "sk-ant-...",
//!   "model": "claude-sonnet-4-5",
//!   "max_tokens": 2048,
//!   "timeout_sec": 120
//! }
//! ```
//!
//! Contract notes:
//! - every field is optional except that an API key must come from the file
//!   or the environment;
//! - `max_tokens` and `timeout_sec` must be > 0 when provided;
//! - unknown JSON fields are rejected.
//!
//! Conversation memory contract: the [`app::Session`] owns the ordered
//! (role, text) history, replays it on every completion, and records an
//! exchange only after the provider succeeds.

pub mod app;
pub mod commands;
pub mod providers;
