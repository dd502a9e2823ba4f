/// Protected-path policy.
///
/// Operating-system, application, and variable-data roots are never scanned
/// into and never mutated. A path is protected when it equals, or lies
/// below, one of the guard's prefixes. Matching is done on whole path
/// components of the lexically normalized absolute path; symlinks are not
/// resolved.
use std::path::{Component, Path, PathBuf};

/// Protected roots shared by every Unix-like platform.
#[cfg(unix)]
const UNIX_PREFIXES: &[&str] = &[
    "/System",
    "/Library",
    "/usr",
    "/bin",
    "/sbin",
    "/private",
    "/etc",
    "/var",
    "/Applications",
    "/dev",
];

/// Kernel and boot roots that only exist on Linux.
#[cfg(target_os = "linux")]
const LINUX_PREFIXES: &[&str] = &[
    "/boot", "/lib", "/lib32", "/lib64", "/proc", "/sys", "/run", "/snap",
];

#[cfg(windows)]
const WINDOWS_PREFIXES: &[&str] = &[
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "C:\\ProgramData",
];

/// A set of protected path prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    prefixes: Vec<PathBuf>,
}

impl PathGuard {
    /// The platform's built-in policy.
    pub fn system() -> Self {
        let mut raw: Vec<&str> = Vec::new();
        #[cfg(unix)]
        raw.extend_from_slice(UNIX_PREFIXES);
        #[cfg(target_os = "linux")]
        raw.extend_from_slice(LINUX_PREFIXES);
        #[cfg(windows)]
        raw.extend_from_slice(WINDOWS_PREFIXES);
        Self::with_prefixes(raw)
    }

    /// A guard over an explicit prefix list. Relative prefixes are resolved
    /// against the current directory.
    pub fn with_prefixes<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| normalize(p.as_ref()))
                .collect(),
        }
    }

    /// A guard that protects nothing.
    pub fn permissive() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// `true` if `path` is a protected prefix or a descendant of one.
    pub fn is_protected(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

impl Default for PathGuard {
    fn default() -> Self {
        Self::system()
    }
}

/// Check `path` against the platform's built-in policy.
pub fn is_protected(path: &Path) -> bool {
    PathGuard::system().is_protected(path)
}

/// Make `path` absolute and drop `.` and `..` components without touching
/// the filesystem. `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
        }
    }
    out
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn system_roots_and_descendants_are_protected() {
        let guard = PathGuard::system();
        assert!(guard.is_protected(Path::new("/System")));
        assert!(guard.is_protected(Path::new("/System/anything")));
        assert!(guard.is_protected(Path::new("/var/log/syslog")));
        assert!(guard.is_protected(Path::new("/usr/local/bin")));
        assert!(!guard.is_protected(Path::new("/Users/me/Downloads")));
        assert!(!guard.is_protected(Path::new("/home/me/Downloads")));
        assert!(!guard.is_protected(Path::new("/")));
    }

    #[test]
    fn matching_is_per_component() {
        let guard = PathGuard::system();
        assert!(!guard.is_protected(Path::new("/variant/data")));
        assert!(!guard.is_protected(Path::new("/usrdata")));
        assert!(!guard.is_protected(Path::new("/Users/me/Library-backup")));
    }

    #[test]
    fn dot_segments_cannot_escape_or_hide() {
        let guard = PathGuard::system();
        assert!(guard.is_protected(Path::new("/home/me/../../etc/passwd")));
        assert!(guard.is_protected(Path::new("/./usr/./lib")));
        assert!(!guard.is_protected(Path::new("/usr/../home/me")));
        assert!(guard.is_protected(Path::new("/../../var")));
    }

    #[test]
    fn custom_prefixes() {
        let guard = PathGuard::with_prefixes(["/data/keep", "/mnt/backup/"]);
        assert!(guard.is_protected(Path::new("/data/keep")));
        assert!(guard.is_protected(Path::new("/data/keep/a/b")));
        assert!(guard.is_protected(Path::new("/mnt/backup/x")));
        assert!(!guard.is_protected(Path::new("/data/keeper")));
        assert!(!guard.is_protected(Path::new("/etc")));

        assert!(!PathGuard::permissive().is_protected(Path::new("/etc")));
    }

    #[test]
    fn normalize_resolves_relative_paths() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize(Path::new("a/./b/../c")), cwd.join("a/c"));
        assert_eq!(normalize(Path::new("/a/b/..")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }
}
