//! テスト用のモック（モデルクライアント・ログ・書き込み失敗 FS）

use crate::adapter::{JsonMemory, MemoryConfig};
use common::adapter::{NoopLog, StdFileSystem};
use common::domain::MemoryFile;
use common::error::Error;
use common::llm::{Completion, ModelClient};
use common::ports::outbound::{FileMetadata, FileSystem, Log, LogLevel, LogRecord};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 用意した応答を順に返し、受け取ったプロンプトを記録するクライアント
///
/// 応答を使い切った後は `ok` を返す。
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<Completion, Error>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<Completion, Error>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn texts(replies: &[&str]) -> Arc<Self> {
        Self::new(
            replies
                .iter()
                .map(|r| Ok(Completion::Text(r.to_string())))
                .collect(),
        )
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl ModelClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(&self, prompt: &str) -> Result<Completion, Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Completion::Text("ok".to_string())))
    }
}

/// 常に通信失敗を返すクライアント
pub struct FailingClient;

impl ModelClient for FailingClient {
    fn name(&self) -> &str {
        "failing"
    }

    fn complete(&self, _prompt: &str) -> Result<Completion, Error> {
        Err(Error::http("connection refused"))
    }
}

/// 受け取ったレコードを溜めるログ
#[derive(Default)]
pub struct RecordingLog {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn has(&self, level: LogLevel, kind: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && r.kind.as_deref() == Some(kind))
    }
}

impl Log for RecordingLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// 読み込みは StdFileSystem、書き込みは常に失敗する FS
pub struct ReadOnlyFs;

impl FileSystem for ReadOnlyFs {
    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        StdFileSystem.read_to_string(path)
    }

    fn write(&self, path: &Path, _contents: &str) -> Result<(), Error> {
        Err(Error::io_msg(format!("{}: read-only file system", path.display())))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        Err(Error::io_msg(format!("{}: read-only file system", path.display())))
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        StdFileSystem.metadata(path)
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
        Err(Error::io_msg(format!("{}: read-only file system", path.display())))
    }
}

pub fn memory_config(path: PathBuf, history_limit: usize, summarize_threshold: usize) -> MemoryConfig {
    MemoryConfig {
        storage_path: MemoryFile::new(path),
        summarize_threshold,
        history_limit,
    }
}

/// StdFileSystem と NoopLog で会話メモリを開く
pub fn open_memory(config: MemoryConfig, summarizer: Arc<dyn ModelClient>) -> JsonMemory {
    JsonMemory::open(config, Arc::new(StdFileSystem), summarizer, Arc::new(NoopLog)).unwrap()
}
