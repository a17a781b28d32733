//! 端末への表示（stdout 相当の Write へ書き出す）
//!
//! 書き込み失敗は anyhow で文脈を付け、境界で Error::Io に変換する。

use anyhow::{Context, Result};
use common::error::Error;
use std::io::Write;
use std::path::Path;

/// 対話ループの入力プロンプト
pub const PROMPT: &str = "> ";

/// まだ記録が無いときの表示
pub const NO_MEMORY_NOTICE: &str = "No memory found yet.";

const EMPTY_TRANSCRIPT_NOTICE: &str = "(no conversation yet)";

const REPL_HELP: &[(&str, &str)] = &[
    ("/history", "Show the conversation so far"),
    ("/log", "Show the raw memory file"),
    ("/export <path>", "Write the memory file to <path>"),
    ("/clear", "Forget the whole conversation"),
    ("/help", "Show this help"),
    ("/quit", "Leave the chat (also /exit or EOF)"),
];

/// ラベル付きの会話履歴を表示する
pub fn write_transcript(out: &mut dyn Write, lines: &[String]) -> Result<()> {
    if lines.is_empty() {
        writeln!(out, "{}", EMPTY_TRANSCRIPT_NOTICE).context("write transcript")?;
        return Ok(());
    }
    for line in lines {
        writeln!(out, "{}", line).context("write transcript")?;
    }
    Ok(())
}

/// モデルの応答を表示する
pub fn write_reply(out: &mut dyn Write, reply: &str) -> Result<()> {
    writeln!(out, "Grok: {}", reply).context("write reply")?;
    out.flush().context("flush reply")
}

/// メモリファイルの中身をそのまま表示する
pub fn write_record(out: &mut dyn Write, record: Option<&str>) -> Result<()> {
    match record {
        Some(text) => writeln!(out, "{}", text).context("write memory log"),
        None => writeln!(out, "{}", NO_MEMORY_NOTICE).context("write memory log"),
    }
}

/// 1 行のお知らせを表示する
pub fn write_notice(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "{}", message).context("write notice")
}

/// エクスポートの結果。まだ記録が無いときはエラーではなくお知らせにする。
pub fn write_export(out: &mut dyn Write, dest: &Path, exported: bool) -> Result<()> {
    if exported {
        writeln!(out, "Memory exported to {}.", dest.display()).context("write export notice")
    } else {
        writeln!(out, "{}", NO_MEMORY_NOTICE).context("write export notice")
    }
}

pub fn write_prompt(out: &mut dyn Write) -> Result<()> {
    write!(out, "{}", PROMPT).context("write prompt")?;
    out.flush().context("flush prompt")
}

/// 対話ループ中に使えるコマンドの一覧
pub fn write_repl_help(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Type a message and press Enter to talk. Commands:").context("write help")?;
    for (cmd, desc) in REPL_HELP {
        writeln!(out, "  {:<16} {}", cmd, desc).context("write help")?;
    }
    Ok(())
}

/// 表示の失敗を Error::Io に変換する
pub fn view_error(e: anyhow::Error) -> Error {
    Error::io_msg(format!("{:#}", e))
}
