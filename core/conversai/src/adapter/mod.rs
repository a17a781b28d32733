//! Outbound ポートの実装と、conversai 固有の入出力

pub mod json_memory;
pub mod persisted_record;
pub mod settings;
pub mod terminal_view;

pub use json_memory::{JsonMemory, LoadOutcome, MemoryConfig};
pub use settings::{load_settings, MemoryOverrides, Settings};
