/// The published, size-ordered result of one scan.
use crate::model::{EntryId, FileEntry};
use std::collections::BTreeSet;

/// Entries sorted by size, largest first.
///
/// Entries of equal size keep their discovery order: the sort is stable and
/// the scanner appends in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    entries: Vec<FileEntry>,
}

impl ScanResult {
    /// Sort entries that are in discovery order into a result.
    pub fn from_discovered(mut entries: Vec<FileEntry>) -> Self {
        entries.sort_by(|a, b| b.size().cmp(&a.size()));
        Self { entries }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Sum of all entry sizes.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(FileEntry::size).sum()
    }

    /// Clone out the entries whose ids are in `ids`, in result order.
    /// Unknown ids are ignored.
    pub fn select(&self, ids: &BTreeSet<EntryId>) -> Vec<FileEntry> {
        self.entries
            .iter()
            .filter(|e| ids.contains(&e.id()))
            .cloned()
            .collect()
    }

    /// Drop the entries whose ids are in `ids`. Returns how many were removed.
    pub fn remove_ids(&mut self, ids: &BTreeSet<EntryId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !ids.contains(&e.id()));
        before - self.entries.len()
    }

    pub fn into_entries(self) -> Vec<FileEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn entry(name: &str, size: u64) -> FileEntry {
        FileEntry::new(PathBuf::from(format!("/data/{name}")), size, SystemTime::now())
    }

    #[test]
    fn sorts_descending_and_keeps_ties_in_discovery_order() {
        let discovered = vec![
            entry("a", 150),
            entry("b", 300),
            entry("c", 150),
            entry("d", 200),
            entry("e", 150),
        ];
        let result = ScanResult::from_discovered(discovered);
        let names: Vec<String> = result.iter().map(FileEntry::file_name).collect();
        assert_eq!(names, ["b", "d", "a", "c", "e"]);
        assert_eq!(result.total_size(), 950);
    }

    #[test]
    fn select_and_remove_by_id() {
        let result_entries = vec![entry("a", 10), entry("b", 20), entry("c", 30)];
        let ids: BTreeSet<EntryId> = [result_entries[0].id(), result_entries[2].id()]
            .into_iter()
            .collect();
        let mut result = ScanResult::from_discovered(result_entries);

        let picked = result.select(&ids);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].file_name(), "c");

        assert_eq!(result.remove_ids(&ids), 2);
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].file_name(), "b");

        // Removing again is a no-op.
        assert_eq!(result.remove_ids(&ids), 0);
    }
}
