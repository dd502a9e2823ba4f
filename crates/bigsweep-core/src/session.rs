/// Scan session, the single owner of scan state.
///
/// The session starts scans on a background thread, drains their events on
/// the caller's (foreground) thread, and publishes the result only when the
/// terminal event arrives. The presentation layer reads state from the
/// session and never shares it with the scan thread.
///
/// Lifecycle: `Idle → Scanning → Completed | Cancelled | Failed`, and from
/// any non-scanning phase back to `Scanning` on the next [`ScanSession::start`].
use crate::eraser::{spawn_delete_ids, DeletionReport, FileEraser};
use crate::error::{ScanError, SessionError};
use crate::model::{EntryId, ScanResult};
use crate::scanner::{start_scan, ScanEvent, ScanHandle, ScanOptions, ScanProgress, ScanSummary};
use crate::worker::TaskHandle;
use crossbeam_channel::{RecvTimeoutError, TryRecvError};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Maximum number of events drained per [`ScanSession::poll`] call.
///
/// Keeps a single poll short when a backlog has built up (e.g. the
/// consumer was busy); the rest is picked up on the next call.
const MAX_EVENTS_PER_POLL: usize = 512;

/// The current phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No scan has been started yet.
    Idle,
    Scanning,
    Completed,
    /// Cancellation was requested. The partial result is published when the
    /// scan thread acknowledges it.
    Cancelled,
    /// The last scan could not start (protected or missing root).
    Failed,
}

pub struct ScanSession {
    options: ScanOptions,
    phase: SessionPhase,
    handle: Option<ScanHandle>,
    root: Option<PathBuf>,
    progress: Option<ScanProgress>,
    result: ScanResult,
    summary: Option<ScanSummary>,
    last_error: Option<ScanError>,
    selection: BTreeSet<EntryId>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl ScanSession {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            phase: SessionPhase::Idle,
            handle: None,
            root: None,
            progress: None,
            result: ScanResult::default(),
            summary: None,
            last_error: None,
            selection: BTreeSet::new(),
        }
    }

    // ── Scanning ──────────────────────────────────────────────

    /// Start scanning `root` with the session's options.
    ///
    /// Fails with [`SessionError::AlreadyScanning`] while a scan is in the
    /// `Scanning` phase, leaving that scan untouched. Otherwise the previous
    /// result and selection are discarded, and any scan still winding down
    /// after a cancel is abandoned: its events are never observed.
    pub fn start(&mut self, root: impl AsRef<Path>) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Scanning {
            return Err(SessionError::AlreadyScanning);
        }

        if let Some(old) = self.handle.take() {
            old.cancel();
        }

        let root = root.as_ref().to_path_buf();
        let handle = start_scan(root.clone(), self.options.clone())?;
        info!("Session: scan of {} started", root.display());

        self.phase = SessionPhase::Scanning;
        self.handle = Some(handle);
        self.root = Some(root);
        self.progress = None;
        self.result = ScanResult::default();
        self.summary = None;
        self.last_error = None;
        self.selection.clear();
        Ok(())
    }

    /// Request cancellation of the running scan. A no-op unless `Scanning`.
    pub fn cancel(&mut self) {
        if self.phase != SessionPhase::Scanning {
            return;
        }
        if let Some(ref handle) = self.handle {
            handle.cancel();
        }
        self.phase = SessionPhase::Cancelled;
        info!("Session: cancellation requested");
    }

    /// Drain pending scan events without blocking.
    ///
    /// Terminal events carry a copy of the newly published result.
    pub fn poll(&mut self) -> Vec<ScanEvent> {
        let mut drained = Vec::new();
        while drained.len() < MAX_EVENTS_PER_POLL {
            let event = match self.handle.as_ref().map(|h| h.events.try_recv()) {
                Some(Ok(e)) => e,
                Some(Err(TryRecvError::Empty)) | None => break,
                Some(Err(TryRecvError::Disconnected)) => {
                    self.scan_thread_vanished();
                    break;
                }
            };
            let event = self.apply(event);
            let terminal = event.is_terminal();
            drained.push(event);
            if terminal {
                break;
            }
        }
        drained
    }

    /// Block for at most `timeout` waiting for the next scan event.
    pub fn next_event(&mut self, timeout: Duration) -> Option<ScanEvent> {
        let received = self.handle.as_ref()?.events.recv_timeout(timeout);
        match received {
            Ok(event) => Some(self.apply(event)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.scan_thread_vanished();
                None
            }
        }
    }

    /// Fold one event into session state and hand it on.
    fn apply(&mut self, event: ScanEvent) -> ScanEvent {
        match event {
            ScanEvent::Progress(progress) => {
                self.progress = Some(progress.clone());
                ScanEvent::Progress(progress)
            }
            ScanEvent::Completed { result, summary } => {
                self.finish(SessionPhase::Completed, summary);
                self.result = result.clone();
                ScanEvent::Completed { result, summary }
            }
            ScanEvent::Cancelled { partial, summary } => {
                self.finish(SessionPhase::Cancelled, summary);
                self.result = partial.clone();
                ScanEvent::Cancelled { partial, summary }
            }
            ScanEvent::Failed(err) => {
                self.phase = SessionPhase::Failed;
                self.handle = None;
                self.last_error = Some(err.clone());
                ScanEvent::Failed(err)
            }
        }
    }

    fn finish(&mut self, phase: SessionPhase, summary: ScanSummary) {
        self.phase = phase;
        self.summary = Some(summary);
        self.handle = None;
    }

    /// The scan thread went away without a terminal event.
    fn scan_thread_vanished(&mut self) {
        self.handle = None;
        if self.phase == SessionPhase::Scanning {
            self.phase = SessionPhase::Cancelled;
        }
    }

    // ── State ─────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == SessionPhase::Scanning
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Options apply from the next `start`.
    pub fn set_options(&mut self, options: ScanOptions) {
        self.options = options;
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Latest progress of the current or last scan.
    pub fn progress(&self) -> Option<&ScanProgress> {
        self.progress.as_ref()
    }

    /// The published result. Empty until a scan finishes.
    pub fn result(&self) -> &ScanResult {
        &self.result
    }

    pub fn summary(&self) -> Option<&ScanSummary> {
        self.summary.as_ref()
    }

    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    // ── Selection ─────────────────────────────────────────────

    /// Mark an entry for deletion. Returns `false` for ids not in the result.
    pub fn select(&mut self, id: EntryId) -> bool {
        if self.result.get(id).is_none() {
            return false;
        }
        self.selection.insert(id);
        true
    }

    pub fn deselect(&mut self, id: EntryId) {
        self.selection.remove(&id);
    }

    /// Flip the selection state of an entry in the result.
    pub fn toggle(&mut self, id: EntryId) {
        if !self.selection.remove(&id) {
            self.select(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.result.iter().map(|e| e.id()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &BTreeSet<EntryId> {
        &self.selection
    }

    // ── Deletion ──────────────────────────────────────────────

    /// Delete the published entries with the given ids on a background
    /// worker. Every requested id lands in the report: ids not in the
    /// result fail with `DeletionError::UnknownEntry`.
    pub fn delete_ids(
        &self,
        ids: &BTreeSet<EntryId>,
        eraser: &FileEraser,
    ) -> io::Result<TaskHandle<DeletionReport>> {
        let unknown = ids
            .iter()
            .copied()
            .filter(|id| self.result.get(*id).is_none())
            .collect();
        spawn_delete_ids(eraser.clone(), self.result.select(ids), unknown)
    }

    /// Delete the current selection on a background worker.
    pub fn delete_selected(&self, eraser: &FileEraser) -> io::Result<TaskHandle<DeletionReport>> {
        self.delete_ids(&self.selection, eraser)
    }

    /// Drop the deleted entries from the result and reset the selection.
    /// Returns how many entries were removed.
    pub fn apply_deletion(&mut self, report: &DeletionReport) -> usize {
        self.selection.clear();
        self.result.remove_ids(&report.succeeded)
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        if let Some(ref handle) = self.handle {
            handle.cancel();
        }
    }
}
