//! 会話のユースケース: 入力 1 件をモデルへ送り、往復を会話メモリへ記録する

use crate::domain::History;
use crate::ports::outbound::ConversationMemory;
use common::error::Error;
use common::llm::ModelClient;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::path::Path;
use std::sync::Arc;

/// 履歴と新しい入力から、モデルへ渡す 1 本のプロンプトを組み立てる
///
/// 各発言を `Human: ...` / `AI: ...` の 1 行にし、最後に `Human: {input}` を付ける。
pub fn render_prompt(history: &History, input: &str) -> String {
    let mut lines: Vec<String> = history
        .iter()
        .map(|turn| format!("{}: {}", turn.prompt_prefix(), turn.text()))
        .collect();
    lines.push(format!("Human: {}", input));
    lines.join("\n")
}

/// 会話セッションのユースケース
pub struct ChatUseCase {
    memory: Box<dyn ConversationMemory>,
    client: Arc<dyn ModelClient>,
    log: Arc<dyn Log>,
}

impl ChatUseCase {
    pub fn new(
        memory: Box<dyn ConversationMemory>,
        client: Arc<dyn ModelClient>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self { memory, client, log }
    }

    /// 1 往復する。空白だけの入力は何もせず None。
    ///
    /// 応答の形が想定外でもマーカー文字列を応答として記録する。通信失敗と書き込み失敗は Err。
    pub fn send(&mut self, input: &str) -> Result<Option<String>, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        let prompt = render_prompt(self.memory.history(), input);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "usecase", "chat", "sending prompt")
                .with_field("client", self.client.name())
                .with_field("history_len", self.memory.history().len())
                .with_field("prompt_chars", prompt.chars().count()),
        );
        let completion = self.client.complete(&prompt)?;
        if completion.is_error() {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "usecase", "chat", "model reply could not be extracted")
                    .with_field("client", self.client.name()),
            );
        }
        let reply = completion.into_text();
        self.memory.record_exchange(input, &reply)?;
        Ok(Some(reply))
    }

    /// 表示用の会話履歴（`You: ...` / `Grok: ...`）
    pub fn transcript(&self) -> Vec<String> {
        self.memory
            .history()
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker_label(), turn.text()))
            .collect()
    }

    /// メモリファイルの中身（まだ無ければ None）
    pub fn memory_log(&self) -> Result<Option<String>, Error> {
        self.memory.persisted_record()
    }

    /// メモリファイルを dest に書き出す（まだ無ければ false）
    pub fn export(&self, dest: &Path) -> Result<bool, Error> {
        self.memory.export_record(dest)
    }

    /// 会話を忘れる
    pub fn reset(&mut self) -> Result<(), Error> {
        self.memory.clear()
    }

    pub fn history(&self) -> &History {
        self.memory.history()
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }
}
