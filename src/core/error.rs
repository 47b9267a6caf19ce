use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the discovery backend.
///
/// The engine itself never surfaces these to its caller — every probe
/// recovers locally and degrades to an empty contribution. They exist to
/// classify port failures (so callers can tell a denied directory from a
/// broken one) and to report config-loading problems.
#[derive(Debug, Error)]
pub enum ScoutError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Access ──────────────────────────────────────────
    #[error("access denied at {0:?}")]
    AccessDenied(PathBuf),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type ScoutResult<T> = Result<T, ScoutError>;

impl ScoutError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ScoutError::AccessDenied(_))
    }
}
