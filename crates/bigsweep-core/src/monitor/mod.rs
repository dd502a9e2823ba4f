/// Disk usage monitor, re-probes a volume on a fixed interval.
///
/// # Usage
///
/// ```ignore
/// let handle = start_usage_monitor(PathBuf::from("/"), DEFAULT_USAGE_REFRESH)?;
/// // receive updates on handle.receiver
/// handle.stop();
/// ```
///
/// # Cancellation
///
/// [`UsageMonitorHandle::stop`] sets a flag that the background thread
/// checks every [`POLL_SLICE`] while it waits for the next refresh, so it
/// exits promptly even with a long interval.
use crate::platform::{probe, DiskUsage};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::RwLock;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Refresh interval used by interactive front-ends.
pub const DEFAULT_USAGE_REFRESH: Duration = Duration::from_secs(5);

/// Longest time the monitor sleeps before re-checking its stop flag.
pub const POLL_SLICE: Duration = Duration::from_millis(100);

/// Message sent from the monitor thread.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageUpdate {
    Refreshed(DiskUsage),
    /// The probe failed; consumers keep showing their previous value.
    Unavailable(String),
}

/// Handle to a running usage monitor.
pub struct UsageMonitorHandle {
    /// Write `true` to request the background thread to exit.
    pub cancel: Arc<AtomicBool>,
    pub receiver: Receiver<UsageUpdate>,
    latest: Arc<RwLock<Option<DiskUsage>>>,
}

impl UsageMonitorHandle {
    /// Signal the background thread to stop. Non-blocking.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Most recent successful probe, independent of what has been drained
    /// from `receiver`. `None` until the first probe succeeds.
    pub fn latest(&self) -> Option<DiskUsage> {
        *self.latest.read()
    }
}

impl Drop for UsageMonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start probing the volume containing `path` every `interval`.
///
/// The first probe happens immediately.
pub fn start_usage_monitor(path: PathBuf, interval: Duration) -> io::Result<UsageMonitorHandle> {
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = Arc::clone(&cancel);
    let latest = Arc::new(RwLock::new(None));
    let latest_clone = Arc::clone(&latest);
    let (tx, rx) = bounded::<UsageUpdate>(16);

    std::thread::Builder::new()
        .name("bigsweep-usage".to_owned())
        .spawn(move || run_monitor(path, interval, cancel_clone, latest_clone, tx))?;

    Ok(UsageMonitorHandle {
        cancel,
        receiver: rx,
        latest,
    })
}

// ─── Background thread ──────────────────────────────────────────────────────

fn run_monitor(
    path: PathBuf,
    interval: Duration,
    cancel: Arc<AtomicBool>,
    latest: Arc<RwLock<Option<DiskUsage>>>,
    tx: Sender<UsageUpdate>,
) {
    debug!("Usage monitor: starting on {}", path.display());

    while !cancel.load(Ordering::Relaxed) {
        let update = match probe(&path) {
            Ok(usage) => {
                *latest.write() = Some(usage);
                UsageUpdate::Refreshed(usage)
            }
            Err(err) => {
                debug!("Usage monitor: {err}");
                UsageUpdate::Unavailable(err.to_string())
            }
        };
        // A full channel means the consumer is behind; drop this sample
        // rather than queue stale ones.
        if let Err(crossbeam_channel::TrySendError::Disconnected(_)) = tx.try_send(update) {
            break;
        }

        let next = Instant::now() + interval;
        while !cancel.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= next {
                break;
            }
            std::thread::sleep(POLL_SLICE.min(next - now));
        }
    }

    debug!("Usage monitor: stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_volume_reports_and_stops() {
        let handle = start_usage_monitor(
            PathBuf::from("/definitely/not/here/bigsweep"),
            Duration::from_millis(10),
        )
        .unwrap();

        let first = handle
            .receiver
            .recv_timeout(Duration::from_secs(10))
            .expect("monitor must report at least once");
        assert!(matches!(first, UsageUpdate::Unavailable(_)));
        assert_eq!(handle.latest(), None);

        handle.stop();
        // After stopping, the channel disconnects once the thread exits.
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match handle.receiver.recv_timeout(Duration::from_millis(50)) {
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                _ => assert!(Instant::now() < deadline, "monitor did not stop"),
            }
        }
    }
}
