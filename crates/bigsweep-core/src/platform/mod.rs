/// Platform-specific functionality: protected-path policy, volume capacity
/// queries, and trash location lookup.

pub mod protected;
pub mod trash;
pub mod volume;

pub use protected::{is_protected, normalize, PathGuard};
pub use trash::trash_dirs;
pub use volume::{default_volume_root, probe, probe_root, DiskUsage};
