//! JSON ファイルに永続化する会話メモリ
//!
//! 起動時にメモリファイルを読み込み、変更のたびにファイル全体を上書きする。
//! 閾値より長い assistant の応答はモデルクライアントで要約してから記録する。
//! 読み込みと要約の失敗は握りつぶして続行し（warn ログ）、書き込みの失敗だけを呼び出し元へ返す。

use crate::adapter::persisted_record;
use crate::domain::{History, Turn, MAX_HISTORY};
use crate::ports::outbound::ConversationMemory;
use common::domain::MemoryFile;
use common::error::Error;
use common::llm::{Completion, ModelClient};
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_MEMORY_FILE: &str = "memory.json";
pub const DEFAULT_SUMMARIZE_THRESHOLD: usize = 500;

const SUMMARIZE_INSTRUCTION: &str = "Please summarize the following text concisely:";

/// 会話メモリの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    /// メモリファイルの場所
    pub storage_path: MemoryFile,
    /// この文字数を超える応答を要約する
    pub summarize_threshold: usize,
    /// 保持する発言数の上限
    pub history_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            storage_path: MemoryFile::new(DEFAULT_MEMORY_FILE),
            summarize_threshold: DEFAULT_SUMMARIZE_THRESHOLD,
            history_limit: MAX_HISTORY,
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.history_limit == 0 {
            return Err(Error::invalid_argument("history limit must be at least 1"));
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(Error::invalid_argument("memory file path must not be empty"));
        }
        Ok(())
    }
}

/// 要約依頼のプロンプト
pub fn summarize_prompt(text: &str) -> String {
    format!("{}\n\n{}", SUMMARIZE_INSTRUCTION, text)
}

/// Load() の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// ファイルが無い（空の履歴）
    Missing,
    /// 読み込めた（上限で切り詰めた後の件数と、読み飛ばした要素数）
    Loaded { turns: usize, skipped: usize },
    /// 読み出しに失敗した（空の履歴）
    Unreadable(String),
    /// JSON として不正（空の履歴）
    Malformed(String),
}

/// JSON ファイルに永続化する会話メモリ
pub struct JsonMemory {
    config: MemoryConfig,
    history: History,
    fs: Arc<dyn FileSystem>,
    summarizer: Arc<dyn ModelClient>,
    log: Arc<dyn Log>,
}

impl JsonMemory {
    /// 設定を検証し、メモリファイルを読み込んで開く
    pub fn open(
        config: MemoryConfig,
        fs: Arc<dyn FileSystem>,
        summarizer: Arc<dyn ModelClient>,
        log: Arc<dyn Log>,
    ) -> Result<Self, Error> {
        config.validate()?;
        let mut memory = Self {
            history: History::with_limit(config.history_limit),
            config,
            fs,
            summarizer,
            log,
        };
        memory.load();
        Ok(memory)
    }

    /// メモリファイルを読み直して履歴を置き換える。失敗しても空の履歴で続行する。
    pub fn load(&mut self) -> LoadOutcome {
        let path = self.config.storage_path.to_path_buf();
        let outcome = match self.fs.metadata(&path) {
            Err(_) => {
                self.history.clear();
                LoadOutcome::Missing
            }
            Ok(meta) if meta.is_dir() => {
                self.history.clear();
                LoadOutcome::Unreadable(format!("'{}' is a directory", path.display()))
            }
            Ok(_) => match self
                .fs
                .read_to_string(&path)
                .and_then(|text| persisted_record::decode(&text))
            {
                Ok(decoded) => {
                    self.history = History::from_turns(decoded.turns, self.config.history_limit);
                    LoadOutcome::Loaded {
                        turns: self.history.len(),
                        skipped: decoded.skipped,
                    }
                }
                Err(Error::Io(reason)) => {
                    self.history.clear();
                    LoadOutcome::Unreadable(reason)
                }
                Err(e) => {
                    self.history.clear();
                    LoadOutcome::Malformed(e.to_string())
                }
            },
        };
        self.log_load(&path, &outcome);
        outcome
    }

    fn log_load(&self, path: &Path, outcome: &LoadOutcome) {
        let path = path.display().to_string();
        let record = match outcome {
            LoadOutcome::Missing => {
                LogRecord::new(LogLevel::Debug, "adapter", "memory", "memory file not found")
                    .with_field("path", path)
            }
            LoadOutcome::Loaded { turns, skipped } => {
                LogRecord::new(LogLevel::Info, "adapter", "memory", "memory read")
                    .with_field("path", path)
                    .with_field("count", *turns)
                    .with_field("skipped", *skipped)
            }
            LoadOutcome::Unreadable(reason) => {
                LogRecord::new(LogLevel::Warn, "adapter", "memory", "memory file unreadable; starting empty")
                    .with_field("path", path)
                    .with_field("error", reason.as_str())
            }
            LoadOutcome::Malformed(reason) => {
                LogRecord::new(LogLevel::Warn, "adapter", "memory", "memory file malformed; starting empty")
                    .with_field("path", path)
                    .with_field("error", reason.as_str())
            }
        };
        let _ = self.log.log(&record);
    }

    /// 閾値を超える応答を要約する。どんな失敗でも元のテキストを返す。
    fn condense(&self, text: &str) -> String {
        let chars = text.chars().count();
        if chars <= self.config.summarize_threshold {
            return text.to_string();
        }
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "adapter", "summarize", "response exceeds threshold; summarizing")
                .with_field("chars", chars)
                .with_field("threshold", self.config.summarize_threshold)
                .with_field("client", self.summarizer.name()),
        );
        match self.summarizer.complete(&summarize_prompt(text)) {
            Ok(Completion::Text(summary)) if !summary.trim().is_empty() => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Info, "adapter", "summarize", "summary generated")
                        .with_field("chars", chars)
                        .with_field("summary_chars", summary.chars().count()),
                );
                summary
            }
            Ok(other) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Warn, "adapter", "summarize", "summarization returned no usable text; saving original")
                        .with_field("reply", other.into_text()),
                );
                text.to_string()
            }
            Err(e) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Warn, "adapter", "summarize", "summarization failed; saving original")
                        .with_field("error", e.to_string()),
                );
                text.to_string()
            }
        }
    }

    /// 履歴全体でファイルを上書きする
    fn persist(&self) -> Result<(), Error> {
        let path: &Path = self.config.storage_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs.create_dir_all(parent)?;
            }
        }
        let json = persisted_record::encode(self.history.turns())?;
        self.fs.write(path, &json)?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "adapter", "memory", "memory write")
                .with_field("path", path.display().to_string())
                .with_field("count", self.history.len()),
        );
        Ok(())
    }
}

impl ConversationMemory for JsonMemory {
    fn history(&self) -> &History {
        &self.history
    }

    fn record_exchange(&mut self, user_text: &str, assistant_text: &str) -> Result<(), Error> {
        if !user_text.is_empty() {
            self.history.push(Turn::human(user_text));
        }
        if !assistant_text.is_empty() {
            let text = self.condense(assistant_text);
            self.history.push(Turn::assistant(text));
        }
        self.persist()
    }

    fn append_raw(&mut self, turns: Vec<Turn>) -> Result<(), Error> {
        self.history.extend(turns);
        self.persist()
    }

    fn clear(&mut self) -> Result<(), Error> {
        self.history.clear();
        self.persist()?;
        let _ = self.log.log(&LogRecord::new(
            LogLevel::Info,
            "adapter",
            "memory",
            "memory cleared",
        ));
        Ok(())
    }

    fn persisted_record(&self) -> Result<Option<String>, Error> {
        let path: &Path = self.config.storage_path.as_ref();
        if !self.fs.exists(path) {
            return Ok(None);
        }
        self.fs.read_to_string(path).map(Some)
    }

    fn export_record(&self, dest: &Path) -> Result<bool, Error> {
        let Some(record) = self.persisted_record()? else {
            return Ok(false);
        };
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs.create_dir_all(parent)?;
            }
        }
        self.fs.write(dest, &record)?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "adapter", "memory", "memory exported")
                .with_field("dest", dest.display().to_string()),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_defaults() {
        let c = MemoryConfig::default();
        assert_eq!(c.storage_path, MemoryFile::new("memory.json"));
        assert_eq!(c.summarize_threshold, 500);
        assert_eq!(c.history_limit, 20);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_memory_config_rejects_zero_limit() {
        let c = MemoryConfig {
            history_limit: 0,
            ..MemoryConfig::default()
        };
        assert!(c.validate().unwrap_err().is_usage());
    }

    #[test]
    fn test_summarize_prompt() {
        assert_eq!(
            summarize_prompt("long text"),
            "Please summarize the following text concisely:\n\nlong text"
        );
    }
}
