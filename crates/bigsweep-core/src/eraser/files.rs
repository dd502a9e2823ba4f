/// Best-effort deletion of scanned files.
///
/// Every entry is attempted; a failure on one never stops the rest. The
/// report says exactly which ids were deleted and why the others were not,
/// so the caller can drop only the deleted entries from its result.
use crate::error::DeletionError;
use crate::model::size::format_size;
use crate::model::{EntryId, FileEntry};
use crate::platform::PathGuard;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use tracing::{info, warn};

/// Outcome of one batch deletion.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub succeeded: BTreeSet<EntryId>,
    pub failed: BTreeMap<EntryId, DeletionError>,
    /// Sum of the sizes of the deleted entries, as recorded at scan time.
    pub freed_bytes: u64,
}

impl DeletionReport {
    /// Number of distinct entries attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary, e.g. `deleted 4 of 5 files (1.2 GB); 1 failed:
    /// permission denied`.
    pub fn summary(&self) -> String {
        let total = self.attempted();
        let noun = if total == 1 { "file" } else { "files" };
        let mut line = format!(
            "deleted {} of {} {} ({})",
            self.succeeded.len(),
            total,
            noun,
            format_size(self.freed_bytes)
        );
        if !self.failed.is_empty() {
            let reasons: BTreeSet<String> =
                self.failed.values().map(DeletionError::reason).collect();
            let reasons: Vec<String> = reasons.into_iter().collect();
            line.push_str(&format!(
                "; {} failed: {}",
                self.failed.len(),
                reasons.join(", ")
            ));
        }
        line
    }

    /// Record a requested id that had no entry to delete.
    pub fn record_unknown(&mut self, id: EntryId) {
        if self.succeeded.contains(&id) || self.failed.contains_key(&id) {
            return;
        }
        warn!("Cannot delete {id}: not in the current scan result");
        self.failed.insert(id, DeletionError::UnknownEntry(id));
    }
}

/// Deletes files that came out of a scan.
#[derive(Debug, Clone, Default)]
pub struct FileEraser {
    guard: PathGuard,
}

impl FileEraser {
    /// An eraser that refuses anything `guard` protects.
    pub fn new(guard: PathGuard) -> Self {
        Self { guard }
    }

    /// Delete every entry, collecting per-entry failures.
    ///
    /// Entries are processed in the given order; a repeated id is only
    /// attempted once.
    pub fn delete(&self, entries: &[FileEntry]) -> DeletionReport {
        let mut report = DeletionReport::default();

        for entry in entries {
            let id = entry.id();
            if report.succeeded.contains(&id) || report.failed.contains_key(&id) {
                continue;
            }
            match self.delete_one(entry) {
                Ok(()) => {
                    info!(
                        "Deleted {} ({} bytes)",
                        entry.path().display(),
                        entry.size()
                    );
                    report.freed_bytes += entry.size();
                    report.succeeded.insert(id);
                }
                Err(err) => {
                    warn!("{err}");
                    report.failed.insert(id, err);
                }
            }
        }

        report
    }

    fn delete_one(&self, entry: &FileEntry) -> Result<(), DeletionError> {
        let path = entry.path();
        if self.guard.is_protected(path) {
            return Err(DeletionError::Protected(path.to_path_buf()));
        }

        let meta =
            fs::symlink_metadata(path).map_err(|e| DeletionError::from_io(path.to_path_buf(), e))?;
        if !meta.is_file() {
            return Err(DeletionError::NotAFile(path.to_path_buf()));
        }

        fs::remove_file(path).map_err(|e| DeletionError::from_io(path.to_path_buf(), e))
    }
}
