//! ClientConfig からモデルクライアントを生成するファクトリ

use crate::error::Error;
use crate::llm::config::{ClientConfig, ProviderKind};
use crate::llm::echo::EchoClient;
use crate::llm::openai_compat::ChatCompletionsClient;
use crate::llm::provider::ModelClient;
use crate::ports::outbound::Log;
use std::sync::Arc;

/// 設定に応じたクライアントを生成する
pub fn create_client(
    config: &ClientConfig,
    log: Arc<dyn Log>,
) -> Result<Arc<dyn ModelClient>, Error> {
    let client: Arc<dyn ModelClient> = match config.provider {
        ProviderKind::Groq => Arc::new(ChatCompletionsClient::new(config, log)?),
        ProviderKind::Echo => Arc::new(EchoClient::new()),
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::NoopLog;
    use crate::domain::ModelName;

    fn config(provider: ProviderKind) -> ClientConfig {
        ClientConfig {
            provider,
            endpoint: "https://api.example.com".to_string(),
            model: ModelName::new("m"),
            temperature: 0.7,
            api_key: None,
        }
    }

    #[test]
    fn test_create_client_by_provider() {
        let echo = create_client(&config(ProviderKind::Echo), Arc::new(NoopLog)).unwrap();
        assert_eq!(echo.name(), "echo");
        let groq = create_client(&config(ProviderKind::Groq), Arc::new(NoopLog)).unwrap();
        assert_eq!(groq.name(), "groq");
    }
}
