//! Chat Completions 互換エンドポイント（Groq 等）のクライアント
//!
//! プロンプトを唯一の user メッセージとして送る。ステータスコードにかかわらず本文を解釈し、
//! 応答の形の違いは Completion（エラーマーカー含む）に正規化する。

use crate::error::Error;
use crate::llm::config::ClientConfig;
use crate::llm::provider::{Completion, ModelClient};
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use serde_json::{json, Value};
use std::sync::Arc;

/// Chat Completions 互換クライアント（blocking）
pub struct ChatCompletionsClient {
    endpoint: String,
    model: String,
    temperature: f64,
    api_key: Option<String>,
    http: reqwest::blocking::Client,
    log: Arc<dyn Log>,
}

impl ChatCompletionsClient {
    pub fn new(config: &ClientConfig, log: Arc<dyn Log>) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.to_string(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            http,
            log,
        })
    }

    /// リクエストペイロード（model, temperature, messages=[user]）
    pub fn make_request_payload(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| format!("Bearer {}", key))
    }
}

impl ModelClient for ChatCompletionsClient {
    fn name(&self) -> &str {
        "groq"
    }

    fn complete(&self, prompt: &str) -> Result<Completion, Error> {
        let body = serde_json::to_string(&self.make_request_payload(prompt))
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(body);
        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "adapter", "llm", "non-success status")
                    .with_field("status", status.as_u16())
                    .with_field("endpoint", self.endpoint.as_str()),
            );
        }
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "adapter", "llm", "raw response")
                .with_field("status", status.as_u16())
                .with_field("body", response_text.as_str()),
        );

        Ok(Completion::from_body(&response_text))
    }
}
