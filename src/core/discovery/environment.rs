// ─── Environment Probe ───
// JAVA_HOME plus a concurrent existence check of every PATH segment.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::{stream, StreamExt};
use tracing::{debug, warn};

use crate::core::ports::{Environment, Filesystem};

use super::{probe_concurrency, RuntimeEntry};

const JAVA_HOME_VAR: &str = "JAVA_HOME";
const PATH_VAR: &str = "PATH";

/// One PATH segment paired with the outcome of its existence check.
/// Consumed immediately by the aggregation below, never retained.
struct ProbeResult {
    path: PathBuf,
    exists: bool,
}

pub struct EnvironmentProbe {
    fs: Arc<dyn Filesystem>,
    env: Arc<dyn Environment>,
    executable: String,
    separator: char,
}

impl EnvironmentProbe {
    pub fn new(
        fs: Arc<dyn Filesystem>,
        env: Arc<dyn Environment>,
        executable: impl Into<String>,
        separator: char,
    ) -> Self {
        Self {
            fs,
            env,
            executable: executable.into(),
            separator,
        }
    }

    /// Emits `<JAVA_HOME>/bin` when the variable points at an existing
    /// directory — on trust, with no executable check — then probes every
    /// PATH segment for the executable concurrently. Segment order is not
    /// preserved; a missing segment is "not found", never an error.
    pub async fn probe(&self) -> Vec<RuntimeEntry> {
        let mut entries = Vec::new();

        if let Some(java_home) = self.env.var(JAVA_HOME_VAR) {
            let java_home = PathBuf::from(java_home);
            if self.fs.exists(&java_home) {
                entries.push(RuntimeEntry::new(java_home.join("bin")));
            }
        }

        let segments: Vec<PathBuf> = self
            .env
            .var(PATH_VAR)
            .map(|raw| {
                raw.split(self.separator)
                    .filter(|segment| !segment.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        let checks: Vec<_> = stream::iter(segments.into_iter().map(|segment| {
            let fs = Arc::clone(&self.fs);
            let executable = self.executable.clone();
            tokio::task::spawn_blocking(move || ProbeResult {
                exists: fs.exists(&segment.join(executable)),
                path: segment,
            })
        }))
        .buffer_unordered(probe_concurrency())
        .collect()
        .await;

        for check in checks {
            match check {
                Ok(result) if result.exists => entries.push(RuntimeEntry::new(result.path)),
                Ok(_) => {}
                Err(err) => warn!("PATH probe worker failed: {}", err),
            }
        }

        debug!("environment probe found {} entries", entries.len());
        entries
    }
}
