//! conversai 固有のドメイン型（型と不変条件）

pub mod command;
pub mod history;
pub mod turn;

pub use command::{Command, ReplInput};
pub use history::{History, MAX_HISTORY};
pub use turn::Turn;
