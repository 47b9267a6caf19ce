// ─── Windows Discovery ───
// Registry and environment probes composed with either a full multi-drive
// scan or a scan of the conventional install roots. The probes are generic
// over the platform ports and compile on every OS; only the constructor
// that wires the real registry and drive table is Windows-gated.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::config::KeywordSet;
use crate::core::ports::{DriveInfo, DriveKind, Environment, Filesystem, Registry};

use super::environment::EnvironmentProbe;
use super::tree::TreeSearch;
use super::{scan_tree_roots, DiscoveryOptions, DiscoveryStrategy, RuntimeEntry};

/// Launcher executable probed for at every Windows tier.
pub const WINDOWS_JAVA_EXECUTABLE: &str = "javaw.exe";

/// Registry subtree where vendors register installed JDKs and JREs.
const JAVA_SOFT_SUBTREE: &str = r"SOFTWARE\JavaSoft";

/// Conventional install roots are far shallower than a whole drive; one
/// level less than the full-scan default keeps the quick mode quick.
const CONVENTIONAL_ROOT_DEPTH: usize = 6;

/// The Microsoft Store Minecraft launcher caches a private runtime here,
/// relative to `%LOCALAPPDATA%`.
const STORE_LAUNCHER_RUNTIME: &str =
    r"Packages\Microsoft.4297127D64EC6_8wekyb3d8bbwe\LocalCache\Local\runtime";

/// Reads vendor-registered `JavaHome` values out of the installed-Java
/// registry subtree.
pub struct RegistryProbe {
    registry: Arc<dyn Registry>,
    fs: Arc<dyn Filesystem>,
}

impl RegistryProbe {
    pub fn new(registry: Arc<dyn Registry>, fs: Arc<dyn Filesystem>) -> Self {
        Self { registry, fs }
    }

    /// A missing subtree, child key, or value is a normal empty case —
    /// this probe never errors. Entries are emitted only after verifying
    /// the executable under `<JavaHome>\bin`.
    pub fn probe(&self) -> Vec<RuntimeEntry> {
        let Some(subtree) = self.registry.open_subtree(JAVA_SOFT_SUBTREE) else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for child in subtree.child_key_names() {
            let Some(key) = self
                .registry
                .open_subtree(&format!(r"{JAVA_SOFT_SUBTREE}\{child}"))
            else {
                continue;
            };
            let Some(java_home) = key.string_value("JavaHome") else {
                continue;
            };
            let bin = PathBuf::from(java_home).join("bin");
            if self.fs.exists(&bin.join(WINDOWS_JAVA_EXECUTABLE)) {
                entries.push(RuntimeEntry::new(bin));
            }
        }

        debug!("registry probe found {} entries", entries.len());
        entries
    }
}

/// Selects the drive roots worth handing to a full scan.
pub struct DriveEnumerator {
    drives: Arc<dyn DriveInfo>,
    fs: Arc<dyn Filesystem>,
}

impl DriveEnumerator {
    pub fn new(drives: Arc<dyn DriveInfo>, fs: Arc<dyn Filesystem>) -> Self {
        Self { drives, fs }
    }

    /// Roots of ready, fixed drives. A root that is itself a reparse point
    /// is excluded — a drive-level junction could redirect the scan into an
    /// unbounded or cyclic location.
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        self.drives
            .list_drives()
            .into_iter()
            .filter(|drive| drive.ready && drive.kind == DriveKind::Fixed)
            .map(|drive| drive.root)
            .filter(|root| !self.fs.is_reparse_point(root))
            .collect()
    }
}

pub struct WindowsDiscovery {
    fs: Arc<dyn Filesystem>,
    registry: RegistryProbe,
    environment: EnvironmentProbe,
    drives: DriveEnumerator,
    tree: Arc<TreeSearch>,
    conventional_roots: Vec<PathBuf>,
}

impl WindowsDiscovery {
    pub fn new(
        fs: Arc<dyn Filesystem>,
        env: Arc<dyn Environment>,
        registry: Arc<dyn Registry>,
        drives: Arc<dyn DriveInfo>,
        keywords: KeywordSet,
    ) -> Self {
        let conventional_roots = conventional_roots(env.as_ref());
        Self {
            registry: RegistryProbe::new(registry, Arc::clone(&fs)),
            environment: EnvironmentProbe::new(
                Arc::clone(&fs),
                env,
                WINDOWS_JAVA_EXECUTABLE,
                ';',
            ),
            drives: DriveEnumerator::new(drives, Arc::clone(&fs)),
            tree: Arc::new(TreeSearch::new(
                Arc::clone(&fs),
                keywords,
                WINDOWS_JAVA_EXECUTABLE,
            )),
            conventional_roots,
            fs,
        }
    }

    #[cfg(windows)]
    pub fn with_system_ports(keywords: KeywordSet) -> Self {
        use crate::core::ports::{OsEnvironment, OsFilesystem, SystemDrives, WindowsRegistry};

        Self::new(
            Arc::new(OsFilesystem),
            Arc::new(OsEnvironment),
            Arc::new(WindowsRegistry),
            Arc::new(SystemDrives),
            keywords,
        )
    }
}

/// `%ProgramFiles%\Java`, `%ProgramFiles(x86)%\Java` (standard locations
/// when the variables are unset) and the Store launcher's runtime cache.
fn conventional_roots(env: &dyn Environment) -> Vec<PathBuf> {
    let program_files = env
        .var("ProgramFiles")
        .unwrap_or_else(|| r"C:\Program Files".to_string());
    let program_files_x86 = env
        .var("ProgramFiles(x86)")
        .unwrap_or_else(|| r"C:\Program Files (x86)".to_string());

    let mut roots = vec![
        PathBuf::from(program_files).join("Java"),
        PathBuf::from(program_files_x86).join("Java"),
    ];
    if let Some(local_app_data) = env.var("LOCALAPPDATA") {
        roots.push(PathBuf::from(local_app_data).join(STORE_LAUNCHER_RUNTIME));
    }
    roots
}

#[async_trait]
impl DiscoveryStrategy for WindowsDiscovery {
    async fn discover(&self, options: DiscoveryOptions) -> Vec<RuntimeEntry> {
        // Cheap, high-confidence sources first.
        let mut entries = self.registry.probe();
        entries.extend(self.environment.probe().await);

        if options.full_search {
            let roots = self.drives.scan_roots();
            info!(
                "full search across {} drive roots, max depth {}",
                roots.len(),
                options.max_depth
            );
            entries.extend(scan_tree_roots(Arc::clone(&self.tree), roots, options.max_depth).await);
        } else {
            let roots: Vec<PathBuf> = self
                .conventional_roots
                .iter()
                .filter(|root| self.fs.exists(root))
                .cloned()
                .collect();
            entries
                .extend(scan_tree_roots(Arc::clone(&self.tree), roots, CONVENTIONAL_ROOT_DEPTH).await);
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ports::fakes::{MapEnvironment, MapRegistry, MemoryFilesystem, StaticDrives};
    use crate::core::ports::DriveRecord;

    const EXE: &str = WINDOWS_JAVA_EXECUTABLE;

    fn sorted_paths(entries: Vec<RuntimeEntry>) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = entries.into_iter().map(|entry| entry.path).collect();
        paths.sort();
        paths
    }

    #[test]
    fn registry_probe_without_subtree_is_empty() {
        let probe = RegistryProbe::new(
            Arc::new(MapRegistry::new()),
            Arc::new(MemoryFilesystem::new()),
        );
        assert!(probe.probe().is_empty());
    }

    #[test]
    fn registry_probe_verifies_the_executable_before_emitting() {
        let fs = MemoryFilesystem::new()
            .with_file(PathBuf::from("/reg/jdk17/bin").join(EXE))
            .with_dir("/reg/jdk8/bin");
        let registry = MapRegistry::new()
            .with_key(r"SOFTWARE\JavaSoft\JDK-17", &[("JavaHome", "/reg/jdk17")])
            // Present but the executable is gone from disk.
            .with_key(r"SOFTWARE\JavaSoft\JDK-8", &[("JavaHome", "/reg/jdk8")])
            // No JavaHome value at all.
            .with_key(r"SOFTWARE\JavaSoft\Stale", &[]);

        let probe = RegistryProbe::new(Arc::new(registry), Arc::new(fs));
        assert_eq!(
            sorted_paths(probe.probe()),
            vec![PathBuf::from("/reg/jdk17").join("bin")]
        );
    }

    #[test]
    fn drive_enumerator_keeps_only_ready_fixed_non_reparse_roots() {
        let fs = MemoryFilesystem::new().with_reparse_point("/mnt/junction");
        let drives = StaticDrives::new(vec![
            DriveRecord {
                root: PathBuf::from("/mnt/c"),
                ready: true,
                kind: DriveKind::Fixed,
            },
            DriveRecord {
                root: PathBuf::from("/mnt/usb"),
                ready: true,
                kind: DriveKind::Removable,
            },
            DriveRecord {
                root: PathBuf::from("/mnt/share"),
                ready: true,
                kind: DriveKind::Network,
            },
            DriveRecord {
                root: PathBuf::from("/mnt/ejected"),
                ready: false,
                kind: DriveKind::Fixed,
            },
            DriveRecord {
                root: PathBuf::from("/mnt/junction"),
                ready: true,
                kind: DriveKind::Fixed,
            },
        ]);

        let enumerator = DriveEnumerator::new(Arc::new(drives), Arc::new(fs));
        assert_eq!(enumerator.scan_roots(), vec![PathBuf::from("/mnt/c")]);
    }

    fn full_fixture() -> (MemoryFilesystem, MapEnvironment, MapRegistry, StaticDrives) {
        // One runtime visible to every tier: registry, JAVA_HOME, PATH,
        // the conventional Program Files root and the raw drive scan.
        let fs = MemoryFilesystem::new()
            .with_file(PathBuf::from("/reg/jdk17/bin").join(EXE))
            .with_dir("/envhome")
            .with_file(PathBuf::from("/pathbin").join(EXE))
            .with_file(
                PathBuf::from("/c/Program Files/Java/jdk-21").join(EXE),
            );
        let env = MapEnvironment::new()
            .set("JAVA_HOME", "/envhome")
            .set("PATH", "/pathbin;/not-there")
            .set("ProgramFiles", "/c/Program Files");
        let registry =
            MapRegistry::new().with_key(r"SOFTWARE\JavaSoft\JDK-17", &[("JavaHome", "/reg/jdk17")]);
        let drives = StaticDrives::new(vec![DriveRecord {
            root: PathBuf::from("/c"),
            ready: true,
            kind: DriveKind::Fixed,
        }]);
        (fs, env, registry, drives)
    }

    fn discovery_from(
        fixture: (MemoryFilesystem, MapEnvironment, MapRegistry, StaticDrives),
    ) -> WindowsDiscovery {
        let (fs, env, registry, drives) = fixture;
        WindowsDiscovery::new(
            Arc::new(fs),
            Arc::new(env),
            Arc::new(registry),
            Arc::new(drives),
            KeywordSet::default(),
        )
    }

    #[tokio::test]
    async fn high_confidence_sources_come_first() {
        let discovery = discovery_from(full_fixture());
        let entries = discovery
            .discover(DiscoveryOptions {
                full_search: false,
                max_depth: 7,
            })
            .await;

        assert_eq!(entries[0].path, PathBuf::from("/reg/jdk17").join("bin"));
        assert_eq!(entries[1].path, PathBuf::from("/envhome").join("bin"));
        assert!(entries
            .iter()
            .any(|entry| entry.path == PathBuf::from("/c/Program Files/Java/jdk-21")));
    }

    #[tokio::test]
    async fn quick_mode_results_are_a_subset_of_the_full_scan() {
        let quick = sorted_paths(
            discovery_from(full_fixture())
                .discover(DiscoveryOptions {
                    full_search: false,
                    max_depth: 7,
                })
                .await,
        );
        let full = sorted_paths(
            discovery_from(full_fixture())
                .discover(DiscoveryOptions {
                    full_search: true,
                    max_depth: 7,
                })
                .await,
        );

        assert!(!quick.is_empty());
        for path in &quick {
            assert!(full.contains(path), "missing from full scan: {:?}", path);
        }
    }

    #[tokio::test]
    async fn bare_host_discovers_nothing_and_does_not_fail() {
        let discovery = WindowsDiscovery::new(
            Arc::new(MemoryFilesystem::new()),
            Arc::new(MapEnvironment::new()),
            Arc::new(MapRegistry::new()),
            Arc::new(StaticDrives::new(Vec::new())),
            KeywordSet::default(),
        );

        let entries = discovery
            .discover(DiscoveryOptions {
                full_search: true,
                max_depth: 7,
            })
            .await;
        assert!(entries.is_empty());
    }
}
