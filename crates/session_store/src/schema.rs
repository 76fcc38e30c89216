use chat_provider::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Wire form of one turn: a two-element `[role, text]` array.
///
/// The document format is a plain JSON array of these records, so a tuple
/// struct keeps the on-disk shape explicit and separate from the in-memory
/// value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TurnRecord(pub Role, pub String);

impl From<&Turn> for TurnRecord {
    fn from(turn: &Turn) -> Self {
        Self(turn.role, turn.text.clone())
    }
}

impl From<TurnRecord> for Turn {
    fn from(record: TurnRecord) -> Self {
        Self {
            role: record.0,
            text: record.1,
        }
    }
}
