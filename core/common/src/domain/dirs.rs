//! 実行時ディレクトリ（XDG / CONVERSAI_HOME 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、設定ファイル・ログのパス計算に使う。

use std::path::PathBuf;

const SETTINGS_FILENAME: &str = "settings.json";
const LOG_FILENAME: &str = "conversai.jsonl";

/// 解決済みの config / state ディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Dirs {
    /// 設定ファイル（config/settings.json）
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILENAME)
    }

    /// ログ格納ディレクトリ（state/logs）
    pub fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }

    /// JSONL ログファイル
    pub fn log_path(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILENAME)
    }
}
