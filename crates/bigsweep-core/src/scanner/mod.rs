/// Scanner module, finds large files beneath a root directory.
///
/// [`scan`] is the synchronous engine: it validates the root, walks the
/// tree with the exclusion rules in [`ScanOptions`], and returns entries
/// sorted by size. [`start_scan`] runs the same engine on a background
/// thread and streams [`ScanEvent`]s back over a bounded channel, so a
/// responsive foreground never blocks on filesystem I/O.
pub mod options;
pub mod progress;
pub mod walk;

pub use options::{ScanOptions, DEFAULT_THRESHOLD};
pub use progress::{ScanEvent, ScanProgress, ScanSummary};

use crate::error::ScanError;
use crate::model::ScanResult;
use crate::platform::normalize;
use crossbeam_channel::Receiver;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Maximum number of events that may queue up in the channel.
///
/// If the consumer falls behind, the scanner stalls briefly on `send`
/// rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Cooperative cancellation flag shared between a scan and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop as soon as possible. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Completed,
    /// Stopped early on request; the result is partial.
    Cancelled,
}

/// Result of a scan that got past its preconditions.
#[derive(Debug)]
pub struct ScanOutcome {
    pub status: ScanStatus,
    pub result: ScanResult,
    pub summary: ScanSummary,
}

impl ScanOutcome {
    /// Convert into the terminal event for this scan.
    pub fn into_event(self) -> ScanEvent {
        match self.status {
            ScanStatus::Completed => ScanEvent::Completed {
                result: self.result,
                summary: self.summary,
            },
            ScanStatus::Cancelled => ScanEvent::Cancelled {
                partial: self.result,
                summary: self.summary,
            },
        }
    }
}

/// Scan `root` for files of at least `options.threshold` bytes.
///
/// Fails without touching the filesystem tree if `root` is protected, and
/// fails with [`ScanError::NotADirectory`] if it does not exist or is not a
/// directory. Cancellation is not an error: the partial result comes back
/// with [`ScanStatus::Cancelled`].
pub fn scan(
    root: &Path,
    options: &ScanOptions,
    mut on_progress: impl FnMut(&ScanProgress),
    cancel: &CancelToken,
) -> Result<ScanOutcome, ScanError> {
    let root = normalize(root);

    if options.guard.is_protected(&root) {
        warn!("Refusing to scan protected path {}", root.display());
        return Err(ScanError::ProtectedPath(root));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root));
    }

    info!(
        "Scanning {} for files >= {} bytes",
        root.display(),
        options.effective_threshold()
    );
    let start = Instant::now();

    let walked = walk::walk(&root, options, &mut on_progress, cancel);

    let summary = ScanSummary {
        visited: walked.visited,
        skipped: walked.skipped,
        duration: start.elapsed(),
    };
    let status = if walked.cancelled {
        info!(
            "Scan of {} cancelled after {} nodes, {} entries kept",
            root.display(),
            summary.visited,
            walked.found.len()
        );
        ScanStatus::Cancelled
    } else {
        info!(
            "Scan of {} complete: {} entries, {} nodes visited, {} skipped in {:?}",
            root.display(),
            walked.found.len(),
            summary.visited,
            summary.skipped,
            summary.duration
        );
        ScanStatus::Completed
    };

    Ok(ScanOutcome {
        status,
        result: ScanResult::from_discovered(walked.found),
        summary,
    })
}

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Events from the scan thread, terminal event last.
    pub events: Receiver<ScanEvent>,
    cancel: CancelToken,
    _thread: thread::JoinHandle<()>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

/// Start a scan on a new background thread.
///
/// If the returned handle (and so its receiver) is dropped, the scan
/// notices on its next send and stops early.
pub fn start_scan(root: PathBuf, options: ScanOptions) -> io::Result<ScanHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<ScanEvent>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelToken::new();
    let cancel_clone = cancel.clone();

    let thread = thread::Builder::new()
        .name("bigsweep-scanner".into())
        .spawn(move || {
            let progress_tx = tx.clone();
            let on_progress = |p: &ScanProgress| {
                if progress_tx.send(ScanEvent::Progress(p.clone())).is_err() {
                    // Nobody is listening any more.
                    cancel_clone.cancel();
                }
            };

            let terminal = match scan(&root, &options, on_progress, &cancel_clone) {
                Ok(outcome) => outcome.into_event(),
                Err(err) => ScanEvent::Failed(err),
            };
            let _ = tx.send(terminal);
        })?;

    Ok(ScanHandle {
        events: rx,
        cancel,
        _thread: thread,
    })
}
