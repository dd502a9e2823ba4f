/// Data model for scan results.
///
/// `FileEntry` is the immutable record produced once per qualifying file;
/// `ScanResult` is the size-ordered set of entries a scan publishes.
pub mod file_entry;
pub mod scan_result;
pub mod size;

pub use file_entry::{EntryId, FileEntry};
pub use scan_result::ScanResult;
