//! モデルクライアント（テキスト生成エンドポイントへの単発問い合わせ）
//!
//! 会話メモリの要約と、セッションの応答生成の両方がこのモジュールを使う。

pub mod config;
pub mod echo;
pub mod factory;
pub mod openai_compat;
pub mod provider;

pub use config::{ClientConfig, ClientSettings, ProviderKind};
pub use factory::create_client;
pub use provider::{Completion, ModelClient};
