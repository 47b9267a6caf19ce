// ─── Platform Ports ───
// Thin capability traits over OS facilities (filesystem, environment,
// registry, drive table). The discovery engine is written against these
// traits so every probe can be exercised with in-memory doubles.

use std::path::{Path, PathBuf};

use crate::core::error::{ScoutError, ScoutResult};

/// Existence checks and directory listing.
///
/// `list_subdirectories` reports a denied directory as
/// `ScoutError::AccessDenied`; every caller in the engine recovers from it
/// locally and keeps whatever was already found.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn list_subdirectories(&self, path: &Path) -> ScoutResult<Vec<PathBuf>>;
    fn is_reparse_point(&self, path: &Path) -> bool;
    /// Stable identity of a directory, used by the scan's cycle guard.
    /// `None` when the path cannot be resolved.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;
}

/// Environment-variable lookup.
pub trait Environment: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Read-only access to the installed-software registry (Windows).
///
/// `open_subtree` returns `None` for a missing key — absence is a normal
/// case, never an error. The returned handle releases its underlying key
/// when dropped.
pub trait Registry: Send + Sync {
    fn open_subtree(&self, path: &str) -> Option<Box<dyn RegistryKey>>;
}

/// Scoped handle to one opened registry key.
pub trait RegistryKey {
    fn child_key_names(&self) -> Vec<String>;
    fn string_value(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKind {
    Fixed,
    Removable,
    Network,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct DriveRecord {
    pub root: PathBuf,
    pub ready: bool,
    pub kind: DriveKind,
}

/// Mounted-drive table (Windows scan roots).
pub trait DriveInfo: Send + Sync {
    fn list_drives(&self) -> Vec<DriveRecord>;
}

// ── OS-backed implementations ───────────────────────────

pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_subdirectories(&self, path: &Path) -> ScoutResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::PermissionDenied {
                ScoutError::AccessDenied(path.to_path_buf())
            } else {
                ScoutError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        // `is_dir` follows links so symlinked install directories are
        // listed too; the scan's visited set keeps that from looping.
        Ok(entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect())
    }

    fn is_reparse_point(&self, path: &Path) -> bool {
        let Ok(metadata) = std::fs::symlink_metadata(path) else {
            return false;
        };

        #[cfg(windows)]
        {
            use std::os::windows::fs::MetadataExt;
            const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
            metadata.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
        }
        #[cfg(not(windows))]
        {
            metadata.file_type().is_symlink()
        }
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }
}

pub struct OsEnvironment;

impl Environment for OsEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Local-machine registry hive, opened read-only per subtree.
#[cfg(windows)]
pub struct WindowsRegistry;

#[cfg(windows)]
impl Registry for WindowsRegistry {
    fn open_subtree(&self, path: &str) -> Option<Box<dyn RegistryKey>> {
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ};
        use winreg::RegKey;

        let key = RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(path, KEY_READ)
            .ok()?;
        Some(Box::new(WindowsRegistryKey { key }))
    }
}

#[cfg(windows)]
struct WindowsRegistryKey {
    key: winreg::RegKey,
}

#[cfg(windows)]
impl RegistryKey for WindowsRegistryKey {
    fn child_key_names(&self) -> Vec<String> {
        self.key.enum_keys().filter_map(Result::ok).collect()
    }

    fn string_value(&self, name: &str) -> Option<String> {
        self.key.get_value::<String, _>(name).ok()
    }
}

/// Drive table backed by the refreshed `sysinfo` disk list. Disks the OS
/// reports as removable are excluded from scans; everything listed is
/// considered ready (unready volumes never make it into the list).
pub struct SystemDrives;

impl DriveInfo for SystemDrives {
    fn list_drives(&self) -> Vec<DriveRecord> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .map(|disk| DriveRecord {
                root: disk.mount_point().to_path_buf(),
                ready: true,
                kind: if disk.is_removable() {
                    DriveKind::Removable
                } else {
                    DriveKind::Fixed
                },
            })
            .collect()
    }
}

// ── In-memory doubles for tests ─────────────────────────
