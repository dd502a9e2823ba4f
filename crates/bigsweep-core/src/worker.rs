/// One-shot background tasks.
///
/// Deletion and trash emptying block on filesystem I/O, so each invocation
/// runs on its own named thread and hands its single result back over a
/// channel. The foreground either polls ([`TaskHandle::try_take`]) once per
/// frame or blocks ([`TaskHandle::wait`]) when it has nothing else to do.
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::io;
use std::thread;
use std::time::Duration;

/// Handle to a running one-shot task.
pub struct TaskHandle<T> {
    rx: Receiver<T>,
    _thread: thread::JoinHandle<()>,
}

impl<T> TaskHandle<T> {
    /// Take the result if the task has finished. Returns `None` while it is
    /// still running, or if the task died without producing a result.
    pub fn try_take(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the task finishes. `None` means it died without a result.
    pub fn wait(self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Block for at most `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(v) => Some(v),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Run `task` on a new thread named `name`.
pub fn spawn_task<T, F>(name: &str, task: F) -> io::Result<TaskHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded::<T>(1);
    let thread = thread::Builder::new().name(name.to_owned()).spawn(move || {
        let _ = tx.send(task());
    })?;
    Ok(TaskHandle {
        rx,
        _thread: thread,
    })
}
