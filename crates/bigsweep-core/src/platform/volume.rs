/// Volume capacity queries.
///
/// Reports total, used, and free bytes for the mounted volume that contains
/// a given path. Every call re-queries the OS; nothing is cached.
use crate::error::DiskUsageError;
use std::path::{Path, PathBuf};
use sysinfo::Disks;

/// Capacity of one volume.
///
/// Constructed only through [`DiskUsage::from_capacity`], which keeps
/// `used + free == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    total_bytes: u64,
    used_bytes: u64,
    free_bytes: u64,
}

impl DiskUsage {
    /// Build from total capacity and the space available to the caller.
    ///
    /// Filesystems can report `free > total` briefly (e.g. while a large
    /// delete settles); free space is clamped to the total.
    pub fn from_capacity(total_bytes: u64, free_bytes: u64) -> Self {
        let free_bytes = free_bytes.min(total_bytes);
        Self {
            total_bytes,
            used_bytes: total_bytes - free_bytes,
            free_bytes,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn free_bytes(&self) -> u64 {
        self.free_bytes
    }

    /// Fraction of the volume in use, in `[0, 1]`. A zero-capacity volume
    /// reports `0.0`.
    pub fn used_fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64
        }
    }
}

/// The root of the system volume, probed when the caller names no path.
pub fn default_volume_root() -> PathBuf {
    #[cfg(windows)]
    {
        PathBuf::from("C:\\")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/")
    }
}

/// Query capacity of the system volume.
pub fn probe_root() -> Result<DiskUsage, DiskUsageError> {
    probe(&default_volume_root())
}

/// Query capacity of the volume containing `path`.
///
/// The path is canonicalized first, so it must exist. The volume is the
/// mounted disk with the longest mount point that is an ancestor of the
/// path.
pub fn probe(path: &Path) -> Result<DiskUsage, DiskUsageError> {
    let resolved = std::fs::canonicalize(path).map_err(|source| DiskUsageError::Path {
        path: path.to_path_buf(),
        source,
    })?;

    let disks = Disks::new_with_refreshed_list();
    let best = disks
        .iter()
        .filter(|d| resolved.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().components().count());

    match best {
        Some(disk) => {
            let usage = DiskUsage::from_capacity(disk.total_space(), disk.available_space());
            tracing::debug!(
                "Volume {} for {}: {} of {} bytes used",
                disk.mount_point().display(),
                resolved.display(),
                usage.used_bytes,
                usage.total_bytes
            );
            Ok(usage)
        }
        None => Err(DiskUsageError::NoVolume(resolved)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_plus_free_is_total() {
        let u = DiskUsage::from_capacity(1_000, 250);
        assert_eq!(u.used_bytes() + u.free_bytes(), u.total_bytes());
        assert_eq!(u.used_bytes(), 750);
        assert!((u.used_fraction() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn free_is_clamped_and_fraction_bounded() {
        let u = DiskUsage::from_capacity(100, 500);
        assert_eq!(u.free_bytes(), 100);
        assert_eq!(u.used_bytes(), 0);
        assert_eq!(u.used_fraction(), 0.0);

        let full = DiskUsage::from_capacity(100, 0);
        assert_eq!(full.used_fraction(), 1.0);

        let empty = DiskUsage::from_capacity(0, 0);
        assert_eq!(empty.used_fraction(), 0.0);
    }

    #[test]
    fn probe_missing_path_is_an_error() {
        let err = probe(Path::new("/definitely/not/here/bigsweep")).unwrap_err();
        assert!(matches!(err, DiskUsageError::Path { .. }));
    }

    #[test]
    fn probe_existing_path_upholds_invariants() {
        // Containers may expose no volume list at all; absence of data is an
        // accepted outcome, inconsistent data is not.
        let tmp = tempfile::TempDir::new().unwrap();
        if let Ok(u) = probe(tmp.path()) {
            assert_eq!(u.used_bytes() + u.free_bytes(), u.total_bytes());
            assert!((0.0..=1.0).contains(&u.used_fraction()));
        }
    }
}
