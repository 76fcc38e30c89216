use std::fs;
use std::path::{Component, Path};

use time::OffsetDateTime;

use crate::error::WorkspaceError;
use crate::jail::Jail;

/// One named, jailed root directory. All read/write context operations for
/// the console are confined to the active workspace's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    name: String,
    jail: Jail,
}

impl Workspace {
    /// Opens `workspaces_root/<name>`, creating it if missing. Without a
    /// name, a timestamped `proj-` name is generated.
    pub fn open_or_create(
        workspaces_root: &Path,
        name: Option<&str>,
    ) -> Result<Self, WorkspaceError> {
        let name = match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => {
                validate_name(name)?;
                name.to_string()
            }
            None => auto_name(),
        };

        let root = workspaces_root.join(&name);
        fs::create_dir_all(&root)
            .map_err(|source| WorkspaceError::io("creating workspace", &root, source))?;

        Ok(Self {
            name,
            jail: Jail::new(root)?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.jail.root()
    }

    #[must_use]
    pub fn jail(&self) -> &Jail {
        &self.jail
    }
}

/// A workspace name must be a single normal path component: no separators,
/// no `..`, nothing that could relocate the root.
fn validate_name(name: &str) -> Result<(), WorkspaceError> {
    let mut components = Path::new(name).components();
    let valid = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if valid {
        Ok(())
    } else {
        Err(WorkspaceError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn auto_name() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "proj-{:04}{:02}{:02}-{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
