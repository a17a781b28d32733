//! 会話メモリ Outbound ポート
//!
//! 会話履歴の唯一の持ち主。変更のたびに永続化（ファイル全体の上書き）まで行う。
//! usecase はこの trait 経由でのみ履歴を読み書きし、メモリファイルには直接触れない。

use crate::domain::{History, Turn};
use common::error::Error;
use std::path::Path;

/// 会話メモリ（上限付き履歴 + 永続化 + 長い応答の要約）
pub trait ConversationMemory: Send {
    /// 現在の履歴（モデルへ渡す文脈・表示用）
    fn history(&self) -> &History;

    /// 1 往復を記録する
    ///
    /// 空の user_text / assistant_text は記録しない。assistant_text が閾値より長ければ要約を試み、
    /// 失敗したら元のテキストのまま記録する。書き込み失敗は Err で返す。
    fn record_exchange(&mut self, user_text: &str, assistant_text: &str) -> Result<(), Error>;

    /// 組み立て済みの発言列をそのまま追加する（履歴の事前投入用）
    fn append_raw(&mut self, turns: Vec<Turn>) -> Result<(), Error>;

    /// 履歴を空にして永続化する
    fn clear(&mut self) -> Result<(), Error>;

    /// 永続化されたファイルの中身（まだ無ければ None）
    fn persisted_record(&self) -> Result<Option<String>, Error>;

    /// 永続化されたファイルの中身を dest に書き出す。まだファイルが無ければ何もせず false。
    fn export_record(&self, dest: &Path) -> Result<bool, Error>;
}
