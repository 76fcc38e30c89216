use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;
use crate::jail::Jail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Destination as supplied by the caller, workspace-relative.
    pub relative: PathBuf,
    /// Characters written, matching the console's reporting unit.
    pub chars_written: usize,
}

/// Persists `content` at a jailed destination, creating missing parent
/// directories and overwriting any existing file.
///
/// The containment check runs twice: once lexically before any mutation, and
/// again through the canonicalized parent after `create_dir_all`, so a
/// symlinked intermediate directory cannot redirect the write outside the
/// root.
pub fn write_text(
    jail: &Jail,
    relative_dest: &Path,
    content: &str,
) -> Result<WriteReceipt, WorkspaceError> {
    let destination = jail.resolve_for_write(relative_dest)?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| WorkspaceError::io("creating parent directories", parent, source))?;

        let canonical_parent = parent
            .canonicalize()
            .map_err(|source| WorkspaceError::io("resolving write parent", parent, source))?;
        if !canonical_parent.starts_with(jail.root()) {
            return Err(WorkspaceError::jail_violation(relative_dest));
        }
    }

    fs::write(&destination, content)
        .map_err(|source| WorkspaceError::io("writing file", &destination, source))?;

    Ok(WriteReceipt {
        relative: relative_dest.to_path_buf(),
        chars_written: content.chars().count(),
    })
}
