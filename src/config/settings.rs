use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::base_url::validate_base_url;
use crate::error::RelayError;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "*";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const FALLBACK_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Everything the relay handler needs, resolved once at start-up.
///
/// Empty strings are treated the same as unset values, so `TEAM_TOKEN=""`
/// never authorises anything and `OPENAI_API_KEY=""` still reports the key
/// as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Comma-separated origin list, or `*`.
    pub allowed_origins: String,
    pub team_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            team_token: None,
            openai_api_key: None,
            openai_model: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl RelayConfig {
    pub fn team_token(&self) -> Option<&str> {
        non_empty(self.team_token.as_ref())
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        non_empty(self.openai_api_key.as_ref())
    }

    /// 请求体未指定 model 时使用：配置值优先，否则回退到内置默认
    pub fn default_model(&self) -> &str {
        non_empty(self.openai_model.as_ref()).unwrap_or(FALLBACK_MODEL)
    }
}

impl Settings {
    pub fn load() -> Result<Self, RelayError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let mut settings = match Self::find_config_file() {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Settings::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| RelayError::Config(format!("{}: {}", path.display(), e)))
    }

    /// 用环境变量覆盖配置文件；`lookup` 抽象出来便于测试时不改动进程环境
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ALLOWED_ORIGINS") {
            self.relay.allowed_origins = v;
        }
        if let Some(v) = get("TEAM_TOKEN") {
            self.relay.team_token = Some(v);
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.relay.openai_api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.relay.openai_model = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.relay.openai_base_url = v;
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = v
                .trim()
                .parse()
                .map_err(|_| RelayError::Config(format!("PORT is not a valid port: {v}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        validate_base_url(&self.relay.openai_base_url)?;
        if self.relay.team_token().is_none() {
            tracing::warn!("TEAM_TOKEN is not set; every POST will be rejected");
        }
        if self.relay.openai_api_key().is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; authorised POSTs will fail with 500");
        }
        Ok(())
    }

    fn find_config_file() -> Option<PathBuf> {
        ["custom-config.toml", "config.toml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}
