/// A single large file discovered during a scan.
///
/// Entries are created exactly once per qualifying file and never mutated.
/// They disappear from the published result when the file is deleted or a
/// new scan replaces the result wholesale.
use chrono::{DateTime, Utc};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Process-wide source of entry ids. Starts at 1 so `0` never appears.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier assigned at discovery.
///
/// Ids come from a monotonic counter, so within one scan they increase in
/// discovery order, and an id is never handed out twice in a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    id: EntryId,
    path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
}

impl FileEntry {
    /// Create an entry with a freshly allocated id.
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            id: EntryId::next(),
            path,
            size,
            modified: DateTime::<Utc>::from(modified),
        }
    }

    /// Build an entry by reading the metadata of an existing regular file.
    ///
    /// Used when a caller names files directly instead of taking them from a
    /// scan result. Symlinks are not followed.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::symlink_metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        Ok(Self::new(path.to_path_buf(), meta.len(), meta.modified()?))
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// The final path component, for compact display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}
