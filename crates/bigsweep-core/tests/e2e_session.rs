/// End-to-end session tests.
///
/// These drive `ScanSession` the way a front-end does: start a scan, poll
/// events until the terminal one, then select and delete entries on a
/// background worker and apply the report.
use bigsweep_core::eraser::FileEraser;
use bigsweep_core::error::{DeletionError, ScanError, SessionError};
use bigsweep_core::model::EntryId;
use bigsweep_core::platform::PathGuard;
use bigsweep_core::scanner::{ScanEvent, ScanOptions};
use bigsweep_core::session::{ScanSession, SessionPhase};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn sparse(path: &Path, len: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::File::create(path).unwrap().set_len(len).unwrap();
}

fn session(threshold: u64) -> ScanSession {
    ScanSession::new(
        ScanOptions::default()
            .with_threshold(threshold)
            .with_guard(PathGuard::permissive()),
    )
}

/// Poll until the terminal event, returning every event seen.
///
/// Waits up to 30 seconds so a stuck scan fails the test instead of
/// hanging the suite.
fn drain_to_terminal(session: &mut ScanSession) -> Vec<ScanEvent> {
    let deadline = Instant::now() + Duration::from_secs(30);
    let mut seen = Vec::new();
    loop {
        assert!(
            Instant::now() < deadline,
            "session did not reach a terminal event within 30 seconds"
        );
        for event in session.poll() {
            let terminal = event.is_terminal();
            seen.push(event);
            if terminal {
                return seen;
            }
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn build_tree(root: &Path) {
    sparse(&root.join("a/one.bin"), 1_500);
    sparse(&root.join("a/two.bin"), 3_000);
    sparse(&root.join("b/three.bin"), 2_000);
    sparse(&root.join("tiny.txt"), 10);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn scan_publishes_result_on_completion() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let mut s = session(1_000);
    assert_eq!(s.phase(), SessionPhase::Idle);
    s.start(tmp.path()).unwrap();
    assert!(s.is_scanning());
    assert!(s.result().is_empty(), "result is published only at the end");

    let events = drain_to_terminal(&mut s);
    let last = events.last().unwrap();
    match last {
        ScanEvent::Completed { result, .. } => assert_eq!(result.len(), 3),
        other => panic!("expected Completed, got {other:?}"),
    }
    assert_eq!(s.phase(), SessionPhase::Completed);

    let sizes: Vec<u64> = s.result().iter().map(|e| e.size()).collect();
    assert_eq!(sizes, [3_000, 2_000, 1_500]);
    assert_eq!(s.progress().unwrap().items_found, 3);
    assert!(s.summary().unwrap().visited >= 6);

    // Exactly one terminal event, and it is the last.
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[test]
fn start_while_scanning_is_rejected() {
    let tmp = TempDir::new().unwrap();
    for i in 0..200 {
        sparse(&tmp.path().join(format!("d{}/f{i:03}.bin", i % 10)), 2_000);
    }

    let mut s = session(1_000);
    s.start(tmp.path()).unwrap();
    // The first scan may already be finished, but the phase only changes
    // once its events are drained, so it is still `Scanning` here.
    assert!(matches!(
        s.start(tmp.path()),
        Err(SessionError::AlreadyScanning)
    ));
    drain_to_terminal(&mut s);

    // Once finished, a new scan is accepted and replaces the result.
    s.start(tmp.path()).unwrap();
    let events = drain_to_terminal(&mut s);
    assert!(matches!(events.last(), Some(ScanEvent::Completed { .. })));
    assert_eq!(s.result().len(), 200);
}

#[test]
fn protected_root_fails_without_progress() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let mut s = ScanSession::new(
        ScanOptions::default()
            .with_threshold(1)
            .with_guard(PathGuard::with_prefixes([tmp.path()])),
    );
    s.start(tmp.path()).unwrap();
    let events = drain_to_terminal(&mut s);

    assert_eq!(events.len(), 1, "no progress before the failure");
    assert!(matches!(
        events[0],
        ScanEvent::Failed(ScanError::ProtectedPath(_))
    ));
    assert_eq!(s.phase(), SessionPhase::Failed);
    assert!(matches!(s.last_error(), Some(ScanError::ProtectedPath(_))));
    assert!(s.result().is_empty());
}

#[test]
fn cancel_is_idempotent_and_ends_in_a_terminal_event() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let mut s = session(1_000);
    s.cancel();
    assert_eq!(s.phase(), SessionPhase::Idle, "cancel while idle is a no-op");

    s.start(tmp.path()).unwrap();
    s.cancel();
    s.cancel();
    assert_eq!(s.phase(), SessionPhase::Cancelled);

    // The scan may have finished before it saw the flag; either way exactly
    // one terminal event arrives and the phase follows it.
    let events = drain_to_terminal(&mut s);
    match events.last().unwrap() {
        ScanEvent::Cancelled { partial, .. } => {
            assert_eq!(s.phase(), SessionPhase::Cancelled);
            assert_eq!(s.result().len(), partial.len());
        }
        ScanEvent::Completed { .. } => assert_eq!(s.phase(), SessionPhase::Completed),
        other => panic!("unexpected terminal event {other:?}"),
    }

    // A new scan can start right away.
    s.start(tmp.path()).unwrap();
    drain_to_terminal(&mut s);
    assert_eq!(s.result().len(), 3);
}

#[test]
fn selection_only_accepts_published_ids() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let mut s = session(1_000);
    s.start(tmp.path()).unwrap();
    drain_to_terminal(&mut s);

    let first = s.result().entries()[0].id();
    assert!(s.select(first));
    assert!(!s.select(EntryId::next()));
    s.toggle(first);
    assert!(s.selection().is_empty());
    s.select_all();
    assert_eq!(s.selection().len(), 3);
    s.clear_selection();
    assert!(s.selection().is_empty());
}

/// N entries selected, K deleted, N-K failed: the report says so and the
/// published result keeps exactly the entries that were not deleted.
#[test]
fn delete_selected_applies_only_successes() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());
    let keep_dir = tmp.path().join("b");

    let mut s = session(1_000);
    s.start(tmp.path()).unwrap();
    drain_to_terminal(&mut s);
    s.select_all();

    // One entry vanishes behind the session's back; another sits in a
    // directory the eraser's policy protects.
    let vanished = s
        .result()
        .iter()
        .find(|e| e.file_name() == "one.bin")
        .unwrap()
        .clone();
    fs::remove_file(vanished.path()).unwrap();
    let eraser = FileEraser::new(PathGuard::with_prefixes([&keep_dir]));

    let report = s
        .delete_selected(&eraser)
        .unwrap()
        .wait()
        .expect("eraser worker must report");

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed.len(), 2);
    assert!(report.failed.contains_key(&vanished.id()));
    assert_eq!(report.freed_bytes, 3_000);

    assert_eq!(s.apply_deletion(&report), 1);
    let remaining: BTreeSet<EntryId> = s.result().iter().map(|e| e.id()).collect();
    let expected: BTreeSet<EntryId> = report.failed.keys().copied().collect();
    assert_eq!(remaining, expected);
    assert!(s.selection().is_empty());
    assert!(!tmp.path().join("a/two.bin").exists());
    assert!(keep_dir.join("three.bin").exists());
}

/// Ids that are not in the published result (for example from a replaced
/// scan) are reported as failed, so the report covers every requested id.
#[test]
fn delete_ids_reports_unknown_ids_as_failed() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let mut s = session(1_000);
    s.start(tmp.path()).unwrap();
    drain_to_terminal(&mut s);

    let largest = s.result().entries()[0].id();
    let stale = EntryId::next();
    let ids: BTreeSet<EntryId> = [largest, stale].into_iter().collect();
    let report = s
        .delete_ids(&ids, &FileEraser::new(PathGuard::permissive()))
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(report.succeeded.len() + report.failed.len(), ids.len());
    assert!(report.succeeded.contains(&largest));
    assert!(matches!(
        report.failed[&stale],
        DeletionError::UnknownEntry(id) if id == stale
    ));
    assert!(report.summary().starts_with("deleted 1 of 2 files"));

    s.apply_deletion(&report);
    assert_eq!(s.result().len(), 2);
    assert!(s.result().get(largest).is_none());
}
