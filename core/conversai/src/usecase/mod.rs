//! ユースケース（ポート経由でのみ I/O を行う）

pub mod chat;
pub mod interactive;
