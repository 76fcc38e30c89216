use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::WorkspaceError;

/// Containment boundary around one workspace root.
///
/// All resolution is component-wise: the containment decision compares path
/// components, never raw strings, so a root of `/ws/proj-1` can never be
/// satisfied by `/ws/proj-10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jail {
    root: PathBuf,
}

impl Jail {
    /// Creates a jail around `root`, which must be an existing directory.
    ///
    /// The root is canonicalized once here; every later containment check
    /// compares against this resolved form.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        let canonical = root
            .canonicalize()
            .map_err(|source| WorkspaceError::io("resolving workspace root", &root, source))?;

        if !canonical.is_dir() {
            return Err(WorkspaceError::RootNotADirectory { path: canonical });
        }

        Ok(Self { root: canonical })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `relative` against the root without touching the filesystem.
    ///
    /// `.` and `..` components are folded lexically; the result must still
    /// start with the root. An empty path or one resolving to the root itself
    /// is allowed. Callers must run this check before any read; a rejected
    /// path is never opened.
    pub fn resolve(&self, relative: &Path) -> Result<PathBuf, WorkspaceError> {
        let normalized = normalize_lexically(&self.root.join(relative));
        if normalized.starts_with(&self.root) {
            Ok(normalized)
        } else {
            Err(WorkspaceError::jail_violation(relative))
        }
    }

    /// Resolves a path that is expected to exist, following symlinks.
    ///
    /// The lexical check runs first so escaping paths are rejected without
    /// filesystem access; the canonicalized result is then re-checked to
    /// catch symlinks pointing outside the root.
    pub fn resolve_existing(&self, relative: &Path) -> Result<PathBuf, WorkspaceError> {
        let lexical = self.resolve(relative)?;
        let canonical = lexical.canonicalize().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                WorkspaceError::not_found(relative)
            } else {
                WorkspaceError::io("resolving path", &lexical, source)
            }
        })?;

        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            Err(WorkspaceError::jail_violation(relative))
        }
    }

    /// Resolves a destination that may not exist yet.
    ///
    /// The nearest existing ancestor of the destination is canonicalized and
    /// must sit inside the root; the returned path is the lexical resolution,
    /// suitable for `create_dir_all` + write.
    pub fn resolve_for_write(&self, relative: &Path) -> Result<PathBuf, WorkspaceError> {
        let lexical = self.resolve(relative)?;
        let parent = match lexical.parent() {
            Some(parent) => parent,
            None => return Err(WorkspaceError::jail_violation(relative)),
        };

        let anchor = canonicalize_existing_ancestor(parent)?;
        if anchor.starts_with(&self.root) {
            Ok(lexical)
        } else {
            Err(WorkspaceError::jail_violation(relative))
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}

fn canonicalize_existing_ancestor(path: &Path) -> Result<PathBuf, WorkspaceError> {
    for ancestor in path.ancestors() {
        if ancestor.exists() {
            return ancestor
                .canonicalize()
                .map_err(|source| WorkspaceError::io("resolving path", ancestor, source));
        }
    }

    Err(WorkspaceError::io(
        "resolving path",
        path,
        io::Error::new(io::ErrorKind::NotFound, "no existing ancestor"),
    ))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::Jail;
    use crate::error::WorkspaceError;

    fn jail_in_tempdir() -> (tempfile::TempDir, Jail) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let jail = Jail::new(dir.path()).expect("jail should wrap tempdir");
        (dir, jail)
    }

    #[test]
    fn empty_relative_path_resolves_to_root() {
        let (_dir, jail) = jail_in_tempdir();
        let resolved = jail.resolve(Path::new("")).expect("empty path is allowed");
        assert_eq!(resolved, jail.root());
    }

    #[test]
    fn current_dir_component_resolves_to_root() {
        let (_dir, jail) = jail_in_tempdir();
        let resolved = jail.resolve(Path::new(".")).expect("dot path is allowed");
        assert_eq!(resolved, jail.root());
    }

    #[test]
    fn parent_escape_is_a_jail_violation() {
        let (_dir, jail) = jail_in_tempdir();
        let error = jail
            .resolve(Path::new("../escape.txt"))
            .expect_err("parent escape must be rejected");
        assert!(matches!(error, WorkspaceError::JailViolation { .. }));
    }

    #[test]
    fn deep_parent_escape_is_a_jail_violation() {
        let (_dir, jail) = jail_in_tempdir();
        let error = jail
            .resolve(Path::new("a/b/../../../../etc/passwd"))
            .expect_err("nested escape must be rejected");
        assert!(matches!(error, WorkspaceError::JailViolation { .. }));
    }

    #[test]
    fn dotdot_inside_root_is_allowed() {
        let (_dir, jail) = jail_in_tempdir();
        let resolved = jail
            .resolve(Path::new("sub/../a.txt"))
            .expect("path folding back inside the root is allowed");
        assert_eq!(resolved, jail.root().join("a.txt"));
    }

    #[test]
    fn sibling_with_shared_name_prefix_is_rejected() {
        let base = tempfile::tempdir().expect("tempdir should be created");
        let root = base.path().join("proj-1");
        let sibling = base.path().join("proj-10");
        fs::create_dir(&root).expect("root should be created");
        fs::create_dir(&sibling).expect("sibling should be created");

        let jail = Jail::new(&root).expect("jail should wrap proj-1");
        let error = jail
            .resolve(&sibling.join("a.txt"))
            .expect_err("component-wise containment must reject proj-10");
        assert!(matches!(error, WorkspaceError::JailViolation { .. }));
    }

    #[test]
    fn absolute_path_inside_root_is_allowed() {
        let (_dir, jail) = jail_in_tempdir();
        let inside = jail.root().join("file.txt");
        let resolved = jail
            .resolve(&inside)
            .expect("absolute path inside the root is allowed");
        assert_eq!(resolved, inside);
    }

    #[test]
    fn resolve_existing_reports_not_found() {
        let (_dir, jail) = jail_in_tempdir();
        let error = jail
            .resolve_existing(Path::new("missing.txt"))
            .expect_err("missing file must be not-found");
        assert!(matches!(error, WorkspaceError::NotFound { .. }));
    }

    #[test]
    fn resolve_for_write_accepts_unborn_nested_destination() {
        let (_dir, jail) = jail_in_tempdir();
        let resolved = jail
            .resolve_for_write(Path::new("deep/nested/out.txt"))
            .expect("unborn destination inside the root is writable");
        assert_eq!(resolved, jail.root().join("deep/nested/out.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escaping_root_is_rejected_on_read() {
        let outside = tempfile::tempdir().expect("outside tempdir should be created");
        fs::write(outside.path().join("secret.txt"), "secret")
            .expect("outside file should be written");

        let (_dir, jail) = jail_in_tempdir();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            jail.root().join("link.txt"),
        )
        .expect("symlink should be created");

        let error = jail
            .resolve_existing(Path::new("link.txt"))
            .expect_err("symlink escaping the root must be rejected");
        assert!(matches!(error, WorkspaceError::JailViolation { .. }));
    }
}
