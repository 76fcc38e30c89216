use std::fs;
use std::path::{Path, PathBuf};

use crate::classify;
use crate::error::WorkspaceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub kind: EntryKind,
    /// Path relative to the scanned directory.
    pub relative: PathBuf,
}

/// Result of one recursive walk: the full listing plus the text-file subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub entries: Vec<ScanEntry>,
    /// Absolute paths of entries classified as text, in traversal order.
    pub text_files: Vec<PathBuf>,
}

impl ScanResult {
    /// Renders the listing as `[DIR]`/`[FILE]`-tagged lines in walk order.
    #[must_use]
    pub fn tree(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|entry| match entry.kind {
                EntryKind::Dir => format!("[DIR]  {}", entry.relative.display()),
                EntryKind::File => format!("[FILE] {}", entry.relative.display()),
            })
            .collect();

        lines.join("\n")
    }
}

/// Walks the subtree rooted at `directory` in deterministic pre-order with
/// lexically sorted siblings.
///
/// Symlinks are treated as leaves: the listing tags them by target type when
/// resolvable, but the walk never descends through one, so link cycles cannot
/// loop the scan.
pub fn scan(directory: &Path) -> Result<ScanResult, WorkspaceError> {
    let mut result = ScanResult::default();
    walk(directory, directory, &mut result)?;
    Ok(result)
}

fn walk(root: &Path, directory: &Path, out: &mut ScanResult) -> Result<(), WorkspaceError> {
    let reader = fs::read_dir(directory)
        .map_err(|source| WorkspaceError::io("reading directory", directory, source))?;

    let mut children: Vec<PathBuf> = Vec::new();
    for entry in reader {
        let entry =
            entry.map_err(|source| WorkspaceError::io("reading directory", directory, source))?;
        children.push(entry.path());
    }
    children.sort();

    for child in children {
        let is_symlink = child
            .symlink_metadata()
            .map(|metadata| metadata.file_type().is_symlink())
            .unwrap_or(false);
        // Follows symlinks for the display tag; a dangling link counts as a file.
        let is_dir = child.metadata().map(|metadata| metadata.is_dir()).unwrap_or(false);

        let relative = child.strip_prefix(root).unwrap_or(&child).to_path_buf();
        if is_dir {
            out.entries.push(ScanEntry {
                kind: EntryKind::Dir,
                relative,
            });
            if !is_symlink {
                walk(root, &child, out)?;
            }
        } else {
            out.entries.push(ScanEntry {
                kind: EntryKind::File,
                relative,
            });
            if classify::is_text(&child) {
                out.text_files.push(child);
            }
        }
    }

    Ok(())
}
