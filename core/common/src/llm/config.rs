//! モデルクライアントの設定型
//!
//! settings.json・CLI・環境変数から集めた部分設定（ClientSettings）を後勝ちでマージし、
//! 最後に環境変数から API キーとエンドポイントを補って ClientConfig に確定する。

use crate::domain::ModelName;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// API キーを読む環境変数名のデフォルト
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
/// エンドポイント URL を読む環境変数名
pub const ENDPOINT_ENV: &str = "GROQ_ENDPOINT";

/// プロバイダ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Bearer 認証の HTTP エンドポイント
    #[default]
    #[serde(alias = "grok", alias = "openai_compat")]
    Groq,
    /// ネットワークに出ないデバッグ用
    Echo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Echo => "echo",
        }
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" | "grok" | "openai_compat" => Ok(Self::Groq),
            "echo" => Ok(Self::Echo),
            other => Err(Error::invalid_argument(format!(
                "Unknown provider '{}'. Expected one of: groq, echo",
                other
            ))),
        }
    }
}

/// 部分設定（未指定は None）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// API キーを読む環境変数名
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ClientSettings {
    /// other の Some を優先してマージする
    pub fn merged(self, other: ClientSettings) -> ClientSettings {
        ClientSettings {
            provider: other.provider.or(self.provider),
            endpoint: other.endpoint.or(self.endpoint),
            model: other.model.or(self.model),
            temperature: other.temperature.or(self.temperature),
            api_key_env: other.api_key_env.or(self.api_key_env),
        }
    }

    /// 環境変数とデフォルトで補完して確定する
    ///
    /// エンドポイントは 明示設定 > GROQ_ENDPOINT > デフォルト の順。
    /// API キーが無くてもエラーにはしない（Authorization を付けずに送る）。
    pub fn resolve(self, env: &dyn EnvResolver) -> Result<ClientConfig, Error> {
        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::env(format!(
                "temperature must be between 0.0 and 2.0 (got {})",
                temperature
            )));
        }
        let api_key_env = self
            .api_key_env
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let endpoint = self
            .endpoint
            .or_else(|| env.var(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Ok(ClientConfig {
            provider: self.provider.unwrap_or_default(),
            endpoint,
            model: ModelName::new(self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string())),
            temperature,
            api_key: env.var(&api_key_env),
        })
    }
}

/// 確定したクライアント設定
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    pub model: ModelName,
    pub temperature: f64,
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dirs;
    use std::collections::HashMap;

    struct MapEnv(HashMap<String, String>);

    impl MapEnv {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl EnvResolver for MapEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }

        fn resolve_dirs(&self) -> Result<Dirs, Error> {
            Err(Error::env("not used"))
        }
    }

    #[test]
    fn test_parse_settings_json() {
        let json = r#"{"provider":"echo","model":"m1","temperature":0.2,"memory_file":"x.json"}"#;
        let s: ClientSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.provider, Some(ProviderKind::Echo));
        assert_eq!(s.model.as_deref(), Some("m1"));
        assert_eq!(s.temperature, Some(0.2));
        assert_eq!(s.endpoint, None);
    }

    #[test]
    fn test_provider_aliases() {
        let s: ClientSettings = serde_json::from_str(r#"{"provider":"grok"}"#).unwrap();
        assert_eq!(s.provider, Some(ProviderKind::Groq));
        assert_eq!(ProviderKind::parse("openai_compat").unwrap(), ProviderKind::Groq);
        assert_eq!(ProviderKind::parse(" Echo ").unwrap(), ProviderKind::Echo);
        let err = ProviderKind::parse("gemini").unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_merged_prefers_later() {
        let file = ClientSettings {
            model: Some("from-file".to_string()),
            temperature: Some(0.1),
            ..Default::default()
        };
        let cli = ClientSettings {
            model: Some("from-cli".to_string()),
            ..Default::default()
        };
        let m = file.merged(cli);
        assert_eq!(m.model.as_deref(), Some("from-cli"));
        assert_eq!(m.temperature, Some(0.1));
    }

    #[test]
    fn test_resolve_defaults_and_env() {
        let env = MapEnv::new(&[("GROQ_API_KEY", "sk-test")]);
        let c = ClientSettings::default().resolve(&env).unwrap();
        assert_eq!(c.provider, ProviderKind::Groq);
        assert_eq!(c.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(c.model.as_ref(), DEFAULT_MODEL);
        assert_eq!(c.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(c.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_resolve_endpoint_precedence() {
        let env = MapEnv::new(&[("GROQ_ENDPOINT", "https://env.example/v1/chat")]);
        let from_env = ClientSettings::default().resolve(&env).unwrap();
        assert_eq!(from_env.endpoint, "https://env.example/v1/chat");

        let explicit = ClientSettings {
            endpoint: Some("https://explicit.example".to_string()),
            ..Default::default()
        }
        .resolve(&env)
        .unwrap();
        assert_eq!(explicit.endpoint, "https://explicit.example");
    }

    #[test]
    fn test_resolve_custom_api_key_env() {
        let env = MapEnv::new(&[("GROQ_API_KEY", "default"), ("MY_KEY", "custom")]);
        let c = ClientSettings {
            api_key_env: Some("MY_KEY".to_string()),
            ..Default::default()
        }
        .resolve(&env)
        .unwrap();
        assert_eq!(c.api_key.as_deref(), Some("custom"));
    }

    #[test]
    fn test_resolve_rejects_out_of_range_temperature() {
        let env = MapEnv::new(&[]);
        let err = ClientSettings {
            temperature: Some(3.5),
            ..Default::default()
        }
        .resolve(&env)
        .unwrap_err();
        assert!(matches!(err, Error::Env(_)));
    }
}
