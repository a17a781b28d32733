//! 会話の 1 発言（Turn）
//!
//! 話者は human / assistant の 2 種類に閉じている。作成後にテキストは変更しない。

/// 会話の 1 発言
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Human(String),
    Assistant(String),
}

impl Turn {
    pub fn human(text: impl Into<String>) -> Self {
        Self::Human(text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Human(s) | Self::Assistant(s) => s,
        }
    }

    /// 画面表示用のラベル
    pub fn speaker_label(&self) -> &'static str {
        match self {
            Self::Human(_) => "You",
            Self::Assistant(_) => "Grok",
        }
    }

    /// プロンプト組み立て用の接頭辞
    pub fn prompt_prefix(&self) -> &'static str {
        match self {
            Self::Human(_) => "Human",
            Self::Assistant(_) => "AI",
        }
    }
}
