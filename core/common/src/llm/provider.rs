//! モデルクライアントのトレイトと応答の正規化
//!
//! エンドポイントが返す本文は 2 通りの形（`response` / `choices[0].message.content`）を受け付ける。
//! どちらにも合わない場合や JSON として読めない場合も Err にはせず、
//! 表示用のエラーマーカー文字列として返す。

use crate::error::Error;
use serde_json::Value;

/// 期待した形のどちらにも合わない応答のマーカー
pub const UNEXPECTED_FORMAT_MARKER: &str = "[ERROR] Unexpected response format";

/// 応答本文を解釈できなかったときのマーカー接頭辞
pub const PARSE_ERROR_PREFIX: &str = "[ERROR parsing JSON]";

/// 1 回の完了要求の結果（通信は成功している）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// 抽出できた応答テキスト
    Text(String),
    /// JSON だが既知の形に合わない
    UnexpectedShape,
    /// 本文を解釈できない（理由付き）
    Malformed(String),
}

impl Completion {
    /// 応答本文から Completion を作る
    ///
    /// `response` を先に見て、無ければ `choices` を見る。
    /// `choices` はあるのに中身が欠けている場合は Malformed とする。
    pub fn from_body(body: &str) -> Self {
        let v: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => return Self::Malformed(e.to_string()),
        };
        // 文字列でない `response`（数値やオブジェクト）は受け付けず、choices か UnexpectedShape へ進む
        if let Some(text) = v.get("response").and_then(Value::as_str) {
            return Self::Text(text.to_string());
        }
        if let Some(choices) = v.get("choices") {
            return match choices[0]["message"]["content"].as_str() {
                Some(text) => Self::Text(text.to_string()),
                None => Self::Malformed("missing choices[0].message.content".to_string()),
            };
        }
        Self::UnexpectedShape
    }

    /// 応答テキスト（エラーマーカーの場合は None）
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// 表示用テキストに変換する（エラーはマーカー文字列になる）
    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::UnexpectedShape => UNEXPECTED_FORMAT_MARKER.to_string(),
            Self::Malformed(reason) => format!("{}: {}", PARSE_ERROR_PREFIX, reason),
        }
    }
}

/// テキスト生成エンドポイントへの単発問い合わせ
///
/// プロンプト 1 つを唯一の user メッセージとして送り、応答を 1 つ返す。
/// Err は通信失敗（接続・TLS・本文の読み出し）のみ。
pub trait ModelClient: Send + Sync {
    /// クライアント名（ログ用）
    fn name(&self) -> &str;

    fn complete(&self, prompt: &str) -> Result<Completion, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_response_field() {
        let c = Completion::from_body(r#"{"response":"Hello"}"#);
        assert_eq!(c, Completion::Text("Hello".to_string()));
        assert_eq!(c.text(), Some("Hello"));
        assert!(!c.is_error());
    }

    #[test]
    fn test_from_body_choices_field() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hi there"}}]}"#;
        assert_eq!(
            Completion::from_body(body),
            Completion::Text("Hi there".to_string())
        );
    }

    #[test]
    fn test_from_body_response_wins_over_choices() {
        let body = r#"{"response":"A","choices":[{"message":{"content":"B"}}]}"#;
        assert_eq!(Completion::from_body(body).into_text(), "A");
    }

    #[test]
    fn test_from_body_unknown_shape_is_marker() {
        let body = r#"{"error":{"message":"Invalid API Key"}}"#;
        let c = Completion::from_body(body);
        assert_eq!(c, Completion::UnexpectedShape);
        assert!(c.is_error());
        assert_eq!(c.text(), None);
        assert_eq!(c.into_text(), "[ERROR] Unexpected response format");
    }

    #[test]
    fn test_from_body_not_json_is_parse_marker() {
        let c = Completion::from_body("<html>502 Bad Gateway</html>");
        assert!(matches!(c, Completion::Malformed(_)));
        let text = c.into_text();
        assert!(text.starts_with("[ERROR parsing JSON]: "));
        assert!(text.len() > "[ERROR parsing JSON]: ".len());
    }

    #[test]
    fn test_from_body_choices_without_content() {
        let c = Completion::from_body(r#"{"choices":[]}"#);
        assert_eq!(
            c.into_text(),
            "[ERROR parsing JSON]: missing choices[0].message.content"
        );
        assert_eq!(
            Completion::from_body(r#"{"choices":[{"message":{}}]}"#),
            Completion::Malformed("missing choices[0].message.content".to_string())
        );
    }

    #[test]
    fn test_from_body_non_string_response_is_unexpected_shape() {
        assert_eq!(
            Completion::from_body(r#"{"response":42}"#),
            Completion::UnexpectedShape
        );
        assert_eq!(
            Completion::from_body(r#"{"response":{"text":"hi"}}"#).into_text(),
            "[ERROR] Unexpected response format"
        );
        assert_eq!(
            Completion::from_body(r#"{"response":42,"choices":[{"message":{"content":"B"}}]}"#),
            Completion::Text("B".to_string())
        );
    }

    #[test]
    fn test_from_body_empty_text_is_still_text() {
        assert_eq!(
            Completion::from_body(r#"{"response":""}"#),
            Completion::Text(String::new())
        );
    }
}
