//! 環境変数解決 Outbound ポート
//!
//! API キー・エンドポイント・設定/ログディレクトリを環境変数から解決する。
//! usecase はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::Dirs;
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のマップなど。
pub trait EnvResolver: Send + Sync {
    /// 環境変数を読む（未設定・空文字は None）
    fn var(&self, name: &str) -> Option<String>;

    /// config / state ディレクトリを解決する
    ///
    /// 優先順位:
    /// 1. CONVERSAI_HOME（config・state とも同じディレクトリ）
    /// 2. $XDG_CONFIG_HOME/conversai, $XDG_STATE_HOME/conversai
    /// 3. $HOME/.config/conversai, $HOME/.local/state/conversai
    fn resolve_dirs(&self) -> Result<Dirs, Error>;
}
