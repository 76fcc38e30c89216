use std::fs;
use std::path::Path;

use crate::error::WorkspaceError;
use crate::jail::Jail;
use crate::{classify, scan};

/// Per-file character budget applied before injection into a conversation.
pub const MAX_FILE_CHARS: usize = 50_000;
pub const TRUNCATED_MARKER: &str = "[TRUNCATED]";

/// Typed outcome of one materialization, so callers can tell a deliberate
/// skip from missing data before everything is flattened to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// The target escaped the workspace; nothing on disk was touched.
    Blocked { relative: String },
    /// The target does not exist inside the workspace.
    Missing { relative: String },
    /// The target exists but is classified as binary; skipped on purpose.
    NonText { relative: String },
    /// The target file could not be read or decoded.
    ReadFailed { relative: String, cause: String },
    /// One delimited file section.
    File { section: String },
    /// Directory tree header plus a section per contained text file.
    Directory { blob: String },
}

impl Materialized {
    /// Flattens the outcome to the fixed display strings of the console
    /// contract.
    #[must_use]
    pub fn render(self) -> String {
        match self {
            Self::Blocked { relative } => {
                format!("[SECURITY BLOCKED] path '{relative}' is outside workspace.")
            }
            Self::Missing { relative } => format!("[ERROR] path '{relative}' not found."),
            Self::NonText { relative } => format!("[SKIP NON-TEXT FILE] {relative}"),
            Self::ReadFailed { relative, cause } => {
                format!("[ERROR reading file '{relative}': {cause}]")
            }
            Self::File { section } => section,
            Self::Directory { blob } => blob,
        }
    }
}

/// Turns a workspace file or directory into a bounded text blob.
///
/// Never fails: every failure mode becomes a marker string. The jail check
/// runs before any filesystem access, so a blocked path is never opened.
#[must_use]
pub fn materialize(jail: &Jail, relative_target: &str) -> String {
    materialize_outcome(jail, relative_target).render()
}

#[must_use]
pub fn materialize_outcome(jail: &Jail, relative_target: &str) -> Materialized {
    let resolved = match jail.resolve_existing(Path::new(relative_target)) {
        Ok(resolved) => resolved,
        Err(WorkspaceError::JailViolation { .. }) => {
            return Materialized::Blocked {
                relative: relative_target.to_string(),
            };
        }
        Err(WorkspaceError::NotFound { .. }) => {
            return Materialized::Missing {
                relative: relative_target.to_string(),
            };
        }
        Err(error) => {
            return Materialized::ReadFailed {
                relative: relative_target.to_string(),
                cause: error.to_string(),
            };
        }
    };

    if resolved.is_dir() {
        return materialize_directory(jail, relative_target, &resolved);
    }

    if !resolved.is_file() {
        return Materialized::Missing {
            relative: relative_target.to_string(),
        };
    }

    if !classify::is_text(&resolved) {
        return Materialized::NonText {
            relative: relative_target.to_string(),
        };
    }

    match fs::read_to_string(&resolved) {
        Ok(content) => Materialized::File {
            section: file_section(&root_relative_display(jail, &resolved), content),
        },
        Err(error) => Materialized::ReadFailed {
            relative: relative_target.to_string(),
            cause: error.to_string(),
        },
    }
}

fn materialize_directory(jail: &Jail, relative_target: &str, directory: &Path) -> Materialized {
    let scanned = match scan::scan(directory) {
        Ok(scanned) => scanned,
        Err(error) => {
            return Materialized::ReadFailed {
                relative: relative_target.to_string(),
                cause: error.to_string(),
            };
        }
    };

    let mut parts = Vec::with_capacity(scanned.text_files.len() + 1);
    parts.push(format!(
        "[DIRECTORY TREE for {relative_target}]\n{}\n",
        scanned.tree()
    ));

    for file in &scanned.text_files {
        let relative = root_relative_display(jail, file);
        // One unreadable file never aborts the rest of the dump.
        match fs::read_to_string(file) {
            Ok(content) => {
                parts.push(format!("\n{}\n", file_section(&relative, content)));
            }
            Err(error) => {
                parts.push(format!("\n--- FILE {relative} ERROR: {error} ---\n"));
            }
        }
    }

    Materialized::Directory {
        blob: parts.join("\n"),
    }
}

fn file_section(relative: &str, content: String) -> String {
    let bounded = truncate_chars(content, MAX_FILE_CHARS);
    format!("--- FILE {relative} BEGIN ---\n{bounded}\n--- FILE {relative} END ---")
}

fn root_relative_display(jail: &Jail, path: &Path) -> String {
    path.strip_prefix(jail.root())
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Cuts `content` at exactly `max_chars` characters, appending the
/// truncation marker on its own line. Character-based, so the cut always
/// lands on a char boundary.
fn truncate_chars(content: String, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        None => content,
        Some((cut, _)) => {
            let mut truncated = content[..cut].to_string();
            truncated.push('\n');
            truncated.push_str(TRUNCATED_MARKER);
            truncated
        }
    }
}
