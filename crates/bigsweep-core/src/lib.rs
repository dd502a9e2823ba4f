/// BigSweep Core: large-file scanning, disk usage, and safe deletion.
///
/// This crate contains all business logic with zero UI dependencies.
/// Front-ends drive it through [`session::ScanSession`] and the erasers,
/// and receive everything back as typed events and reports.
///
/// # Modules
///
/// - [`model`]: `FileEntry`, `ScanResult`, and size formatting.
/// - [`scanner`]: Cancellable background scan with progress reporting.
/// - [`session`]: One-scan-at-a-time orchestration and result ownership.
/// - [`eraser`]: Best-effort file deletion and trash emptying.
/// - [`platform`]: Protected-path policy, volume capacity, trash location.
/// - [`monitor`]: Periodic disk usage refresh.
/// - [`report`]: CSV/JSON export of a result.
pub mod eraser;
pub mod error;
pub mod model;
pub mod monitor;
pub mod platform;
pub mod report;
pub mod scanner;
pub mod session;
pub mod worker;
