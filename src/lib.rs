pub mod core;

pub use crate::core::config::KeywordSet;
#[cfg(windows)]
pub use crate::core::discovery::discover_java_runtimes;
pub use crate::core::discovery::{
    discover_java_runtimes_unix, platform_strategy, DiscoveryOptions, DiscoveryStrategy,
    PlatformKind, RuntimeEntry, DEFAULT_MAX_DEPTH,
};
pub use crate::core::error::{ScoutError, ScoutResult};
