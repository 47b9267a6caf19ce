// ─── Search Configuration ───
// The heuristic keyword set that decides which directories are worth
// descending into during a deep scan.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::{ScoutError, ScoutResult};

/// Directory-name substrings that make a folder a plausible parent of a
/// Java installation. Mixed-language on purpose: launcher and modpack
/// folders on real machines carry both English and Chinese names.
const DEFAULT_KEYWORDS: &[&str] = &[
    "java",
    "jdk",
    "env",
    "环境",
    "run",
    "软件",
    "jre",
    "mc",
    "dragon",
    "soft",
    "cache",
    "temp",
    "corretto",
    "roaming",
    "users",
    "craft",
    "program",
    "世界",
    "net",
    "游戏",
    "oracle",
    "game",
    "file",
    "data",
    "jvm",
    "服务",
    "server",
    "客户",
    "client",
    "整合",
    "应用",
    "运行",
    "前置",
    "mojang",
    "官启",
    "新建文件夹",
    "eclipse",
    "microsoft",
    "hotspot",
    "runtime",
    "x86",
    "x64",
    "forge",
    "原版",
    "optifine",
    "官方",
    "启动",
    "hmcl",
    "mod",
    "高清",
    "download",
    "launch",
    "程序",
    "path",
    "version",
    "baka",
    "pcl",
    "zulu",
    "local",
    "packages",
    "4297127d64ec6",
    "国服",
    "网易",
    "ext",
    "netease",
    "1.",
];

/// Case-insensitive substring set used to prune the recursive scan.
///
/// Static for the lifetime of a discovery run. The embedded defaults can be
/// replaced at startup from a JSON file, so the list is tunable without a
/// rebuild.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    keywords: Vec<String>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|token| token.to_string()))
    }
}

impl KeywordSet {
    /// Builds a set from arbitrary tokens. Tokens are lowercased; empty
    /// tokens are dropped (an empty substring would match every directory
    /// and disable pruning entirely).
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect();
        Self { tokens }
    }

    /// Loads a set from a JSON file of the form `{"keywords": ["java", ...]}`.
    pub fn from_file(path: &Path) -> ScoutResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| ScoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: KeywordFile = serde_json::from_slice(&bytes)?;
        Ok(Self::new(parsed.keywords))
    }

    /// Whether a directory name contains at least one token, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.tokens.iter().any(|token| lower.contains(token))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
