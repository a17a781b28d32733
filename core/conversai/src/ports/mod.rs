//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: usecase が会話メモリを使うための trait

pub mod inbound;
pub mod outbound;
