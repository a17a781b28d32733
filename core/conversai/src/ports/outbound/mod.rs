//! Outbound ポート: usecase が会話メモリを使うための trait
//!
//! FS・ログ・モデルクライアントのポートは common にある。

pub mod conversation_memory;

pub use conversation_memory::ConversationMemory;
