//! conversai のコマンド enum（Command Pattern）
//!
//! CLI のサブコマンドと、対話ループ中のスラッシュコマンドを enum で明示する。

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// conversai の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// ヘルプ表示
    Help,
    /// 対話ループ（コマンド未指定時も含む）
    Chat,
    /// 1 往復だけ送って応答を表示
    Say { message: String },
    /// 会話履歴をラベル付きで表示
    History,
    /// Persisted Record（メモリファイル）をそのまま表示
    Log,
    /// Persisted Record を別ファイルへ書き出す
    Export { dest: PathBuf },
    /// メモリを空にする
    Clear,
}

/// 対話ループの 1 行の解釈結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    /// モデルへ送る発言
    Message(String),
    History,
    Log,
    Export(PathBuf),
    Clear,
    Help,
    Quit,
    /// 空行（何もしない）
    Empty,
    /// 未知のスラッシュコマンド・引数不足
    Invalid(String),
}

fn slash_command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^/([a-z]+)(?:\s+(.*\S))?\s*$").expect("slash command pattern is valid")
    })
}

impl ReplInput {
    /// 入力 1 行を解釈する。`/` で始まらない行はそのまま発言になる。
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if !trimmed.starts_with('/') {
            return Self::Message(trimmed.to_string());
        }
        let Some(caps) = slash_command_re().captures(trimmed) else {
            return Self::Invalid(trimmed.to_string());
        };
        let arg = caps.get(2).map(|m| m.as_str());
        match (&caps[1], arg) {
            ("history", None) => Self::History,
            ("log", None) => Self::Log,
            ("export", Some(dest)) => Self::Export(PathBuf::from(dest)),
            ("export", None) => Self::Invalid("/export requires a destination path".to_string()),
            ("clear", None) => Self::Clear,
            ("help", None) => Self::Help,
            ("quit", None) | ("exit", None) => Self::Quit,
            _ => Self::Invalid(trimmed.to_string()),
        }
    }
}
