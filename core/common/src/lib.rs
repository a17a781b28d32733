//! conversai 共通ライブラリ
//!
//! `conversai` コマンドが使うエラー型・ポート・標準アダプタ・モデルクライアントを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype・ディレクトリ）
pub mod domain;

/// Outbound ポート（FS・環境変数・ログ）
pub mod ports;

/// ポートの標準実装
pub mod adapter;

/// モデルクライアントと設定
pub mod llm;
