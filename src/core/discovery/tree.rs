// ─── Heuristic Tree Search ───
// Depth-bounded recursive walk for runtime executables, pruned by
// directory-name keywords. The primitive behind both the full drive scan
// and the conventional-root scan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::core::config::KeywordSet;
use crate::core::ports::Filesystem;

use super::RuntimeEntry;

pub struct TreeSearch {
    fs: Arc<dyn Filesystem>,
    keywords: KeywordSet,
    executable: String,
}

impl TreeSearch {
    pub fn new(
        fs: Arc<dyn Filesystem>,
        keywords: KeywordSet,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            keywords,
            executable: executable.into(),
        }
    }

    /// Collects an entry for every directory within `max_depth` levels of
    /// `root` (the root itself is level 0) that directly contains the
    /// executable and is reachable through keyword-matching directory names.
    ///
    /// Best-effort by contract: an unreadable directory contributes nothing
    /// and is never an error. A per-invocation visited set stops
    /// symlink/junction cycles that the depth bound alone would not.
    pub fn search(&self, root: &Path, max_depth: usize) -> Vec<RuntimeEntry> {
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        self.walk(root, 0, max_depth, &mut visited, &mut found);
        found
    }

    fn walk(
        &self,
        dir: &Path,
        depth: usize,
        max_depth: usize,
        visited: &mut HashSet<PathBuf>,
        found: &mut Vec<RuntimeEntry>,
    ) {
        if depth >= max_depth {
            return;
        }

        if let Some(canonical) = self.fs.canonicalize(dir) {
            if !visited.insert(canonical) {
                debug!("already visited {:?}, stopping descent", dir);
                return;
            }
        }

        if self.fs.exists(&dir.join(&self.executable)) {
            found.push(RuntimeEntry::new(dir));
        }

        let subdirectories = match self.fs.list_subdirectories(dir) {
            Ok(subdirectories) => subdirectories,
            Err(err) => {
                // Partial results are expected; keep whatever was found.
                debug!("cannot list {:?}: {}", dir, err);
                return;
            }
        };

        for subdirectory in subdirectories {
            let worth_descending = subdirectory
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.keywords.matches(name));
            if worth_descending {
                self.walk(&subdirectory, depth + 1, max_depth, visited, found);
            }
        }
    }
}
