//! Echo クライアントの実装
//!
//! 実際の API は呼び出さず、受け取ったプロンプトの要点を返すだけ。
//! デバッグやオフラインでの動作確認に使う。

use crate::error::Error;
use crate::llm::provider::{Completion, ModelClient};

const PREVIEW_CHARS: usize = 60;

/// Echo クライアント
#[derive(Debug, Clone, Default)]
pub struct EchoClient;

impl EchoClient {
    pub fn new() -> Self {
        Self
    }
}

impl ModelClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    fn complete(&self, prompt: &str) -> Result<Completion, Error> {
        // 最終行（今回の入力）だけを短く返す
        let last_line = prompt.lines().last().unwrap_or("").trim();
        let preview: String = last_line.chars().take(PREVIEW_CHARS).collect();
        Ok(Completion::Text(format!(
            "[Echo] {} ({} chars received)",
            preview,
            prompt.chars().count()
        )))
    }
}
