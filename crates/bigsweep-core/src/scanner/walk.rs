/// Directory walker using `jwalk`.
///
/// Exclusion happens inside `process_read_dir`, before children are yielded
/// or queued for reading: a hidden entry, a package directory, or a
/// protected path is removed from its parent's child list, so the walker
/// never reports it and never descends into it.
///
/// Children are sorted by name, which makes discovery order deterministic
/// whether directories are read serially or on a rayon pool.
use crate::model::FileEntry;
use crate::scanner::progress::ScanProgress;
use crate::scanner::{CancelToken, ScanOptions};
use std::path::Path;
use tracing::debug;

/// Visited nodes between live-status progress events.
///
/// Matches always produce a progress event; these extra events only keep
/// the "currently scanning" path fresh while nothing qualifies.
pub const STATUS_UPDATE_INTERVAL: u64 = 1_000;

/// Raw output of a walk, in discovery order.
pub(crate) struct Walked {
    pub found: Vec<FileEntry>,
    pub visited: u64,
    pub skipped: u64,
    pub cancelled: bool,
}

fn parallelism(threads: usize) -> jwalk::Parallelism {
    if threads <= 1 {
        jwalk::Parallelism::Serial
    } else {
        jwalk::Parallelism::RayonNewPool(threads)
    }
}

/// Walk `root`, collecting regular files of at least the threshold size.
///
/// `cancel` is polled before every node. On cancellation the walk stops
/// immediately and returns what it had found so far.
pub(crate) fn walk(
    root: &Path,
    options: &ScanOptions,
    on_progress: &mut dyn FnMut(&ScanProgress),
    cancel: &CancelToken,
) -> Walked {
    let threshold = options.effective_threshold();
    let filter = options.clone();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(parallelism(options.threads))
        .process_read_dir(move |depth, _dir, _state, children| {
            // `None` is the synthetic listing holding only the root, which
            // the caller has already vetted (and which may itself be hidden).
            if depth.is_none() {
                return;
            }
            children.retain(|child| match child {
                Ok(entry) => {
                    let is_dir = entry.file_type().is_dir();
                    !filter.excludes(entry.file_name(), &entry.path(), is_dir)
                }
                // Keep errors so the main loop can count them.
                Err(_) => true,
            });
        });

    let mut walked = Walked {
        found: Vec::new(),
        visited: 0,
        skipped: 0,
        cancelled: false,
    };

    for entry_result in walker {
        if cancel.is_cancelled() {
            walked.cancelled = true;
            break;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // Typically an unreadable directory.
                walked.skipped += 1;
                debug!("Skipping unreadable entry: {err}");
                continue;
            }
        };

        // The root itself is never a candidate.
        if entry.depth() == 0 {
            continue;
        }

        walked.visited += 1;
        let path = entry.path();

        if walked.visited % STATUS_UPDATE_INTERVAL == 0 {
            on_progress(&ScanProgress {
                items_found: walked.found.len() as u64,
                current_path: path.clone(),
            });
        }

        if !entry.file_type().is_file() {
            continue;
        }

        let (size, modified) = match std::fs::symlink_metadata(&path)
            .and_then(|meta| Ok((meta.len(), meta.modified()?)))
        {
            Ok(v) => v,
            Err(err) => {
                walked.skipped += 1;
                debug!("Cannot read metadata for {}: {err}", path.display());
                continue;
            }
        };

        if size < threshold {
            continue;
        }

        walked.found.push(FileEntry::new(path.clone(), size, modified));
        on_progress(&ScanProgress {
            items_found: walked.found.len() as u64,
            current_path: path,
        });
    }

    walked
}
