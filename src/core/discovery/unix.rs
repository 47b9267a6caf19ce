// ─── Unix / macOS Discovery ───
// A short list of conventional install directories, checked one level
// deep. This tier is trusted: no keywords, no recursion, no depth limit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::core::ports::{Filesystem, OsFilesystem};

use super::{DiscoveryOptions, DiscoveryStrategy, PlatformKind, RuntimeEntry};

const LINUX_SEARCH_PATHS: &[&str] = &["/usr/lib/jvm", "/usr/java", "/opt"];

const MACOS_SEARCH_PATHS: &[&str] = &[
    "/Library/Java/JavaVirtualMachines",
    "/usr/local/Caskroom",
    "/usr/local/opt/openjdk",
    "/opt",
];

pub struct FixedPathProbe {
    fs: Arc<dyn Filesystem>,
}

impl FixedPathProbe {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// Emits every immediate child of an existing conventional directory
    /// that carries either executable layout: `bin/java` or the macOS
    /// bundle layout `Contents/Home/bin/java`. Unreadable directories are
    /// skipped, keeping the partial-result policy of the other probes.
    pub fn probe(&self, kind: PlatformKind) -> Vec<RuntimeEntry> {
        let roots = match kind {
            PlatformKind::Unix => LINUX_SEARCH_PATHS,
            PlatformKind::MacOs => MACOS_SEARCH_PATHS,
        };

        let mut entries = Vec::new();
        for root in roots {
            let root = Path::new(root);
            if !self.fs.exists(root) {
                continue;
            }
            let children = match self.fs.list_subdirectories(root) {
                Ok(children) => children,
                Err(err) => {
                    debug!("cannot list {:?}: {}", root, err);
                    continue;
                }
            };
            for child in children {
                if self.locate_executable(&child).is_some() {
                    entries.push(RuntimeEntry::new(child));
                }
            }
        }

        debug!("fixed path probe found {} entries", entries.len());
        entries
    }

    fn locate_executable(&self, home: &Path) -> Option<PathBuf> {
        let candidates = [
            home.join("bin").join("java"),
            home.join("Contents").join("Home").join("bin").join("java"),
        ];
        candidates
            .into_iter()
            .find(|candidate| self.fs.exists(candidate))
    }
}

pub struct UnixDiscovery {
    probe: FixedPathProbe,
    kind: PlatformKind,
}

impl UnixDiscovery {
    pub fn new(fs: Arc<dyn Filesystem>, kind: PlatformKind) -> Self {
        Self {
            probe: FixedPathProbe::new(fs),
            kind,
        }
    }

    pub fn with_system_ports(kind: PlatformKind) -> Self {
        Self::new(Arc::new(OsFilesystem), kind)
    }
}

#[async_trait]
impl DiscoveryStrategy for UnixDiscovery {
    /// The fixed-path tier is the whole story on Unix/macOS — there is no
    /// deep-scan mode here, so the options are ignored.
    async fn discover(&self, _options: DiscoveryOptions) -> Vec<RuntimeEntry> {
        self.probe.probe(self.kind)
    }
}
