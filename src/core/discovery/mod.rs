// ─── Runtime Discovery ───
// Locates Java installations through cheap high-confidence probes
// (registry, environment variables) backed by a keyword-pruned,
// depth-bounded filesystem scan. Best-effort throughout: a probe that
// cannot read its source contributes nothing instead of failing the run.

pub mod environment;
pub mod tree;
pub mod unix;
pub mod windows;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::config::KeywordSet;

use self::tree::TreeSearch;
pub use self::unix::{FixedPathProbe, UnixDiscovery};
pub use self::windows::{DriveEnumerator, RegistryProbe, WindowsDiscovery};

/// Default ceiling for recursive descent during a full drive scan.
pub const DEFAULT_MAX_DEPTH: usize = 7;

/// A directory believed to contain a launchable Java executable.
///
/// Carries no version or vendor metadata; inspecting the runtime is a
/// consumer concern. Results are not deduplicated or canonicalized — the
/// same physical directory reported by two probes appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeEntry {
    pub path: PathBuf,
}

impl RuntimeEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Unix-family platform selector for the fixed-path probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Unix,
    MacOs,
}

#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    /// Scan every fixed drive from its root instead of only the
    /// conventional install locations. Windows only.
    pub full_search: bool,
    /// Recursion ceiling for the drive scan.
    pub max_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            full_search: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One platform's way of running a discovery pass.
///
/// Implementations always resolve to a (possibly empty) list: missing
/// permissions, unset variables, and absent install locations shrink the
/// result, never fail it.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    async fn discover(&self, options: DiscoveryOptions) -> Vec<RuntimeEntry>;
}

/// Selects the discovery strategy for the current OS, once, at startup.
pub fn platform_strategy(keywords: KeywordSet) -> Box<dyn DiscoveryStrategy> {
    #[cfg(windows)]
    {
        Box::new(WindowsDiscovery::with_system_ports(keywords))
    }
    #[cfg(not(windows))]
    {
        // The fixed-path tier is shallow and trusted; it has no use for
        // the keyword set.
        let _ = keywords;
        #[cfg(target_os = "macos")]
        let kind = PlatformKind::MacOs;
        #[cfg(not(target_os = "macos"))]
        let kind = PlatformKind::Unix;
        Box::new(UnixDiscovery::with_system_ports(kind))
    }
}

/// Windows entry point: registry and environment probes, then either a
/// full multi-drive scan or the conventional install roots.
#[cfg(windows)]
#[instrument]
pub async fn discover_java_runtimes(full_search: bool, max_depth: usize) -> Vec<RuntimeEntry> {
    WindowsDiscovery::with_system_ports(KeywordSet::default())
        .discover(DiscoveryOptions {
            full_search,
            max_depth,
        })
        .await
}

/// Unix/macOS entry point: the shallow fixed-path probe only.
#[instrument]
pub async fn discover_java_runtimes_unix(kind: PlatformKind) -> Vec<RuntimeEntry> {
    UnixDiscovery::with_system_ports(kind)
        .discover(DiscoveryOptions::default())
        .await
}

/// Worker ceiling for the concurrent existence probes and per-root scans.
pub(crate) fn probe_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4)
}

/// Fans a tree search out over independent roots on blocking threads,
/// bounded by the host's parallelism. Root order is not preserved; a
/// worker that dies contributes nothing.
pub(crate) async fn scan_tree_roots(
    tree: Arc<TreeSearch>,
    roots: Vec<PathBuf>,
    max_depth: usize,
) -> Vec<RuntimeEntry> {
    let scans: Vec<_> = stream::iter(roots.into_iter().map(|root| {
        let tree = Arc::clone(&tree);
        tokio::task::spawn_blocking(move || tree.search(&root, max_depth))
    }))
    .buffer_unordered(probe_concurrency())
    .collect()
    .await;

    scans.into_iter().filter_map(Result::ok).flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ports::fakes::MemoryFilesystem;

    #[tokio::test]
    async fn tree_roots_are_scanned_concurrently_and_concatenated() {
        let fs = MemoryFilesystem::new()
            .with_file(PathBuf::from("/a/jdk-1").join("javaw.exe"))
            .with_file(PathBuf::from("/b/jdk-2").join("javaw.exe"))
            .with_file(PathBuf::from("/c/plain").join("javaw.exe"));
        let tree = Arc::new(TreeSearch::new(
            Arc::new(fs),
            KeywordSet::default(),
            "javaw.exe",
        ));

        let roots = vec![
            PathBuf::from("/a"),
            PathBuf::from("/b"),
            PathBuf::from("/c"),
        ];
        let mut paths: Vec<PathBuf> = scan_tree_roots(tree, roots, DEFAULT_MAX_DEPTH)
            .await
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        paths.sort();

        // "plain" matches no keyword, so /c contributes nothing.
        assert_eq!(
            paths,
            vec![PathBuf::from("/a/jdk-1"), PathBuf::from("/b/jdk-2")]
        );
    }

    #[test]
    fn options_default_to_a_quick_search() {
        let options = DiscoveryOptions::default();
        assert!(!options.full_search);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
