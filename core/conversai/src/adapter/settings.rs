//! settings.json の読み込み
//!
//! すべてのキーは省略可能。ファイルが無ければデフォルト、壊れていれば設定エラーにする。

use crate::adapter::json_memory::{MemoryConfig, DEFAULT_MEMORY_FILE, DEFAULT_SUMMARIZE_THRESHOLD};
use crate::domain::MAX_HISTORY;
use common::domain::MemoryFile;
use common::error::Error;
use common::llm::ClientSettings;
use common::ports::outbound::FileSystem;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// settings.json のルート
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    /// provider / endpoint / model / temperature / api_key_env
    #[serde(flatten)]
    pub client: ClientSettings,
    #[serde(default)]
    pub memory_file: Option<PathBuf>,
    #[serde(default)]
    pub summarize_threshold: Option<usize>,
    #[serde(default)]
    pub history_limit: Option<usize>,
}

/// CLI で指定されたメモリ設定（未指定は None）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryOverrides {
    pub memory_file: Option<PathBuf>,
    pub summarize_threshold: Option<usize>,
    pub history_limit: Option<usize>,
}

impl Settings {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// CLI > settings.json > デフォルト の順で MemoryConfig を確定する
    pub fn memory_config(&self, overrides: MemoryOverrides) -> MemoryConfig {
        let storage_path = overrides
            .memory_file
            .or_else(|| self.memory_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMORY_FILE));
        MemoryConfig {
            storage_path: MemoryFile::new(storage_path),
            summarize_threshold: overrides
                .summarize_threshold
                .or(self.summarize_threshold)
                .unwrap_or(DEFAULT_SUMMARIZE_THRESHOLD),
            history_limit: overrides
                .history_limit
                .or(self.history_limit)
                .unwrap_or(MAX_HISTORY),
        }
    }
}

/// 設定ファイルを読む。存在しなければデフォルト。
pub fn load_settings(fs: &dyn FileSystem, path: &Path) -> Result<Settings, Error> {
    if !fs.exists(path) {
        return Ok(Settings::default());
    }
    let content = fs.read_to_string(path)?;
    Settings::parse(&content)
        .map_err(|e| Error::env(format!("Invalid settings file '{}': {}", path.display(), e)))
}
