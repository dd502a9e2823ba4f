/// Scan configuration and the entry-level filters derived from it.
use crate::platform::PathGuard;
use std::ffi::OsStr;
use std::path::Path;

/// Default minimum size for a file to be reported: 100 MB (decimal).
pub const DEFAULT_THRESHOLD: u64 = 100_000_000;

/// Directory extensions that mark an opaque package (an application or
/// document bundle that is presented to the user as a single item).
pub const PACKAGE_EXTENSIONS: &[&str] = &[
    "app",
    "appex",
    "bundle",
    "framework",
    "plugin",
    "kext",
    "prefpane",
    "qlgenerator",
    "saver",
    "xpc",
    "photoslibrary",
    "musiclibrary",
    "tvlibrary",
    "fcpbundle",
    "logicx",
    "xcarchive",
    "xcodeproj",
    "xcworkspace",
    "playground",
    "pkg",
    "mpkg",
    "rtfd",
];

/// Everything that controls one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Minimum file size in bytes. Zero is treated as one.
    pub threshold: u64,
    /// Skip (and never descend into) entries whose name starts with `.`.
    pub skip_hidden: bool,
    /// Treat package directories as opaque: neither report nor descend.
    pub skip_packages: bool,
    /// Directory-reading threads. `0` or `1` walks serially on the scan
    /// thread; larger values use a dedicated rayon pool. Discovery order is
    /// the same either way.
    pub threads: usize,
    /// Protected-path policy applied to the root and every visited entry.
    pub guard: PathGuard,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            skip_hidden: true,
            skip_packages: true,
            threads: 1,
            guard: PathGuard::system(),
        }
    }
}

impl ScanOptions {
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_guard(mut self, guard: PathGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Use one directory-reading thread per logical CPU.
    pub fn parallel(self) -> Self {
        self.with_threads(num_cpus::get())
    }

    /// The threshold actually applied (always at least one byte).
    #[inline]
    pub fn effective_threshold(&self) -> u64 {
        self.threshold.max(1)
    }

    /// `true` if an entry with this name and path must be neither reported
    /// nor descended into.
    pub fn excludes(&self, name: &OsStr, path: &Path, is_dir: bool) -> bool {
        (self.skip_hidden && is_hidden(name))
            || (is_dir && self.skip_packages && is_package_dir(path))
            || self.guard.is_protected(path)
    }
}

/// Names starting with `.` are hidden.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// `true` if the directory's extension names a package format.
pub fn is_package_dir(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            PACKAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
