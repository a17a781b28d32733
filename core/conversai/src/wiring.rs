//! 配線: 標準アダプタで ChatUseCase を組み立てる
//!
//! 設定の優先順位は CLI > settings.json > デフォルト。

use std::sync::Arc;

use common::adapter::{FileJsonLog, StdEnvResolver, StdFileSystem, StderrLog, TeeLog};
use common::error::Error;
use common::llm::{create_client, ProviderKind};
use common::ports::outbound::{EnvResolver, FileSystem, Log, LogLevel, LogRecord};

use crate::adapter::{load_settings, JsonMemory};
use crate::cli::Config;
use crate::usecase::chat::ChatUseCase;

/// 組み立て済みのアプリケーション
pub struct App {
    pub chat: ChatUseCase,
    pub logger: Arc<dyn Log>,
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire(config: &Config) -> Result<App, Error> {
    wire_with(config, Arc::new(StdFileSystem), &StdEnvResolver)
}

/// FS と環境変数を差し替えて組み立てる
pub fn wire_with(
    config: &Config,
    fs: Arc<dyn FileSystem>,
    env: &dyn EnvResolver,
) -> Result<App, Error> {
    let dirs = env.resolve_dirs()?;
    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::clone(&fs), dirs.log_path()));
    let logger: Arc<dyn Log> = if config.verbose {
        Arc::new(TeeLog::new(vec![file_log, Arc::new(StderrLog)]))
    } else {
        file_log
    };

    let settings_path = dirs.settings_path();
    let settings = load_settings(fs.as_ref(), &settings_path)?;
    let client_config = settings
        .client
        .clone()
        .merged(config.client_overrides())
        .resolve(env)?;
    let memory_config = settings.memory_config(config.memory_overrides());

    let _ = logger.log(
        &LogRecord::new(LogLevel::Debug, "wiring", "config", "configuration resolved")
            .with_field("settings", settings_path.display().to_string())
            .with_field("provider", client_config.provider.as_str())
            .with_field("model", client_config.model.to_string())
            .with_field("endpoint", client_config.endpoint.as_str())
            .with_field("memory_file", memory_config.storage_path.display().to_string())
            .with_field("summarize_threshold", memory_config.summarize_threshold)
            .with_field("history_limit", memory_config.history_limit),
    );
    if client_config.provider == ProviderKind::Groq && client_config.api_key.is_none() {
        let _ = logger.log(&LogRecord::new(
            LogLevel::Warn,
            "wiring",
            "config",
            "no API key found; requests are sent without Authorization",
        ));
    }

    let client = create_client(&client_config, Arc::clone(&logger))?;
    let memory = JsonMemory::open(memory_config, fs, Arc::clone(&client), Arc::clone(&logger))?;
    let chat = ChatUseCase::new(Box::new(memory), client, Arc::clone(&logger));
    Ok(App { chat, logger })
}
