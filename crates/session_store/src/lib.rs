//! Durable conversation state for the raven console.
//!
//! Two independent records: the session document (a pretty-printed JSON
//! array of `[role, text]` pairs, rewritten wholesale on every save) and the
//! daily log (append-only plain text, one file per calendar date, written as
//! an audit trail and never read back).

mod error;
mod paths;
mod schema;
mod store;

pub use error::SessionStoreError;
pub use paths::{
    active_session_path, daily_log_file_name, sessions_root, ACTIVE_SESSION_FILE, SESSIONS_DIR,
};
pub use store::SessionStore;
