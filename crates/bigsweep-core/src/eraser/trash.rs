/// Emptying the user's trash.
///
/// All-or-nothing from the caller's point of view: the first item that
/// cannot be removed stops the operation and is reported. Items removed
/// before that stay removed. A trash directory that cannot be listed (for
/// example because it does not exist yet) counts as already empty.
use crate::error::TrashError;
use crate::platform::trash_dirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct TrashEraser {
    dirs: Vec<PathBuf>,
}

impl TrashEraser {
    /// Empty the given directories (their contents, not the directories).
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The current user's trash on this platform.
    pub fn for_current_user() -> Self {
        Self::new(trash_dirs())
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Remove every item in the trash. Returns how many top-level items
    /// were removed.
    pub fn empty_trash(&self) -> Result<usize, TrashError> {
        let mut removed = 0usize;
        for dir in &self.dirs {
            removed += empty_dir(dir, remove_item)?;
        }
        info!("Emptied trash: {removed} items removed");
        Ok(removed)
    }
}

fn empty_dir(
    dir: &Path,
    mut remove: impl FnMut(&Path) -> std::io::Result<()>,
) -> Result<usize, TrashError> {
    let listing = match fs::read_dir(dir) {
        Ok(l) => l,
        Err(err) => {
            debug!("Treating {} as empty: {err}", dir.display());
            return Ok(0);
        }
    };

    let mut removed = 0usize;
    for item in listing {
        let item = item.map_err(|source| TrashError::Remove {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = item.path();
        remove(&path).map_err(|source| TrashError::Remove {
            path: path.clone(),
            source,
        })?;
        debug!("Removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}

/// Remove a file, a symlink (not its target), or a whole directory tree.
fn remove_item(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
