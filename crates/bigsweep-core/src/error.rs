/// Error types for every fallible core operation.
///
/// Errors that concern a whole operation (a protected scan root, a missing
/// directory) abort before any work begins. Errors that concern a single
/// filesystem entry are absorbed by the scanner or collected per entry by
/// the erasers and never abort a batch.
use crate::model::EntryId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that prevent a scan from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The scan root is, or lies inside, a protected system location.
    #[error("refusing to scan protected path {0}")]
    ProtectedPath(PathBuf),

    /// The scan root does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Why a single file could not be deleted.
#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("{0} is a protected path")]
    Protected(PathBuf),

    #[error("{0} no longer exists")]
    NotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path now refers to a directory (or something else that is not a
    /// regular file), so it is no longer the file that was scanned.
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),

    /// The id is not in the published result, e.g. it came from a scan
    /// that has since been replaced.
    #[error("entry {0} is not in the current scan result")]
    UnknownEntry(EntryId),

    #[error("failed to delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeletionError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }

    /// Short human-readable reason, without the path.
    pub fn reason(&self) -> String {
        match self {
            Self::Protected(_) => "protected path".to_string(),
            Self::NotFound(_) => "file not found".to_string(),
            Self::PermissionDenied(_) => "permission denied".to_string(),
            Self::NotAFile(_) => "not a regular file".to_string(),
            Self::UnknownEntry(_) => "unknown entry".to_string(),
            Self::Io { source, .. } => source.to_string(),
        }
    }
}

/// Emptying the trash stopped at the first item that could not be removed.
#[derive(Debug, Error)]
pub enum TrashError {
    #[error("failed to remove trash item {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The platform could not report capacity for a volume.
#[derive(Debug, Error)]
pub enum DiskUsageError {
    #[error("cannot resolve {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no mounted volume contains {0}")]
    NoVolume(PathBuf),
}

/// Failures of the scan session itself (not of the scan).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a scan is already running")]
    AlreadyScanning,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}
