/// Filesystem mutation: deleting scanned files and emptying the trash.
///
/// Both operations are synchronous on their erasers; the `spawn_*`
/// functions run one invocation on a background worker. Neither is
/// cancellable once started.
pub mod files;
pub mod trash;

pub use files::{DeletionReport, FileEraser};
pub use trash::TrashEraser;

use crate::error::TrashError;
use crate::model::{EntryId, FileEntry};
use crate::worker::{spawn_task, TaskHandle};
use std::io;

/// Delete `entries` on a background worker.
pub fn spawn_delete(
    eraser: FileEraser,
    entries: Vec<FileEntry>,
) -> io::Result<TaskHandle<DeletionReport>> {
    spawn_task("bigsweep-eraser", move || eraser.delete(&entries))
}

/// Delete `entries` on a background worker, reporting each id in
/// `unknown` as failed with [`DeletionError::UnknownEntry`].
///
/// [`DeletionError::UnknownEntry`]: crate::error::DeletionError::UnknownEntry
pub fn spawn_delete_ids(
    eraser: FileEraser,
    entries: Vec<FileEntry>,
    unknown: Vec<EntryId>,
) -> io::Result<TaskHandle<DeletionReport>> {
    spawn_task("bigsweep-eraser", move || {
        let mut report = eraser.delete(&entries);
        for id in unknown {
            report.record_unknown(id);
        }
        report
    })
}

/// Empty the trash on a background worker.
pub fn spawn_empty_trash(
    eraser: TrashEraser,
) -> io::Result<TaskHandle<Result<usize, TrashError>>> {
    spawn_task("bigsweep-trash", move || eraser.empty_trash())
}
