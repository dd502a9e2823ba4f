/// Scan events, lightweight messages sent from the scan thread to the
/// foreground consumer via a crossbeam channel.
use crate::error::ScanError;
use crate::model::ScanResult;
use std::path::PathBuf;
use std::time::Duration;

/// Running status of a scan.
///
/// `items_found` never decreases within one scan, and the last progress
/// value equals the number of entries in the final result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    pub items_found: u64,
    pub current_path: PathBuf,
}

/// Counters describing how a scan went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Filesystem nodes visited (the root excluded).
    pub visited: u64,
    /// Entries whose metadata or directory listing could not be read.
    pub skipped: u64,
    pub duration: Duration,
}

/// Everything the scan thread reports.
///
/// Exactly one of `Completed`, `Cancelled`, or `Failed` is sent per scan,
/// and it is always the last event.
#[derive(Debug)]
pub enum ScanEvent {
    Progress(ScanProgress),
    Completed {
        result: ScanResult,
        summary: ScanSummary,
    },
    /// Cancellation was requested; `partial` holds what was found before it.
    Cancelled {
        partial: ScanResult,
        summary: ScanSummary,
    },
    Failed(ScanError),
}

impl ScanEvent {
    /// `true` for the final event of a scan.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}
