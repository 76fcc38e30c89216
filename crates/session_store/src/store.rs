use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chat_provider::{Role, Turn};

use crate::error::SessionStoreError;
use crate::paths::{active_session_path, daily_log_file_name, today};
use crate::schema::TurnRecord;

/// Durable home of one conversation: the overwrite-on-save session document
/// plus the append-only daily log.
///
/// The store never holds the conversation itself; callers own the in-memory
/// `Vec<Turn>` and hand it over wholesale on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStore {
    sessions_root: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at `sessions_root`. No filesystem access
    /// happens here; directories are created on first write.
    #[must_use]
    pub fn new(sessions_root: impl Into<PathBuf>) -> Self {
        Self {
            sessions_root: sessions_root.into(),
        }
    }

    #[must_use]
    pub fn sessions_root(&self) -> &Path {
        &self.sessions_root
    }

    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        active_session_path(&self.sessions_root)
    }

    #[must_use]
    pub fn log_path_for_today(&self) -> PathBuf {
        self.sessions_root.join(daily_log_file_name(today()))
    }

    /// Overwrites the session document with `conversation`, preserving
    /// iteration order exactly.
    pub fn save(&self, conversation: &[Turn]) -> Result<(), SessionStoreError> {
        self.ensure_sessions_root()?;

        let path = self.document_path();
        let records: Vec<TurnRecord> = conversation.iter().map(TurnRecord::from).collect();
        let document = serde_json::to_string_pretty(&records)
            .map_err(|source| SessionStoreError::serialize(&path, source))?;

        fs::write(&path, document)
            .map_err(|source| SessionStoreError::io("writing session document", &path, source))
    }

    /// Loads the conversation from the session document. A missing document
    /// is an empty conversation; a malformed one is a parse error, never
    /// fabricated data.
    pub fn load(&self) -> Result<Vec<Turn>, SessionStoreError> {
        let path = self.document_path();
        let document = match fs::read_to_string(&path) {
            Ok(document) => document,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SessionStoreError::io(
                    "reading session document",
                    &path,
                    source,
                ));
            }
        };

        let records: Vec<TurnRecord> = serde_json::from_str(&document)
            .map_err(|source| SessionStoreError::parse(&path, source))?;
        Ok(records.into_iter().map(Turn::from).collect())
    }

    /// Appends one `[ROLE]\n<text>\n\n` record to today's log.
    ///
    /// Append-only by construction: the file is opened in append mode and
    /// existing content is never read, truncated, or rotated. Callers treat
    /// a failure here as a warning, not an abort of their own operation.
    pub fn append_log(&self, role: Role, text: &str) -> Result<(), SessionStoreError> {
        self.ensure_sessions_root()?;

        let path = self.log_path_for_today();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SessionStoreError::io("opening daily log", &path, source))?;

        let record = format!("[{}]\n{text}\n\n", role.as_str().to_ascii_uppercase());
        file.write_all(record.as_bytes())
            .map_err(|source| SessionStoreError::io("appending to daily log", &path, source))
    }

    fn ensure_sessions_root(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.sessions_root).map_err(|source| {
            SessionStoreError::io("creating sessions directory", &self.sessions_root, source)
        })
    }
}
