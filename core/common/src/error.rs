//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。種別ごとに終了コード（sysexits 準拠）を持つ。

use thiserror::Error as ThisError;

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),
    /// ファイル I/O
    #[error("{0}")]
    Io(String),
    /// JSON のシリアライズ・デシリアライズ
    #[error("{0}")]
    Json(String),
    /// HTTP 通信（接続・TLS・本文の読み出し）
    #[error("{0}")]
    Http(String),
    /// 環境変数・設定ファイル
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// usage を併せて表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Json(_) => 65,
            Self::Io(_) | Self::Http(_) => 74,
            Self::Env(_) => 78,
        }
    }
}
