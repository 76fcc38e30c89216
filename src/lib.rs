//! Workspace-scoped file access for the raven console.
//!
//! Everything the console reads into a conversation or writes back to disk
//! goes through this crate: a named workspace directory wrapped in a
//! containment [`Jail`], a deterministic recursive [`scan`], a text/binary
//! [`classify`] heuristic, bounded context [`materialize`]-ation, and jailed
//! [`write`]s.
//!
//! Containment is decided lexically (no filesystem access) and re-checked
//! through canonicalized paths before any actual read or write; see
//! [`jail::Jail`] for the exact contract.

pub mod classify;
pub mod error;
pub mod jail;
pub mod materialize;
pub mod scan;
pub mod workspace;
pub mod write;

pub use error::WorkspaceError;
pub use jail::Jail;
pub use materialize::{materialize, materialize_outcome, Materialized, MAX_FILE_CHARS};
pub use scan::{scan, EntryKind, ScanEntry, ScanResult};
pub use workspace::Workspace;
pub use write::{write_text, WriteReceipt};
