/// Locating the current user's trash.
///
/// macOS keeps trashed items directly in `~/.Trash`. Freedesktop systems
/// keep them in `$XDG_DATA_HOME/Trash/files` with matching metadata under
/// `Trash/info`; both directories must be emptied together. Windows keeps
/// its recycle bin outside the regular filesystem namespace, so no
/// directories are returned there.
use std::path::PathBuf;

/// Directories whose contents make up the user's trash.
///
/// Missing directories are still returned; emptying a missing directory is
/// treated as emptying an already-empty trash.
pub fn trash_dirs() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|home| vec![home.join(".Trash")])
            .unwrap_or_default()
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs::data_dir()
            .map(|data| {
                let trash = data.join("Trash");
                vec![trash.join("files"), trash.join("info")]
            })
            .unwrap_or_default()
    }
    #[cfg(not(unix))]
    {
        tracing::warn!("No directory-based trash on this platform");
        Vec::new()
    }
}
