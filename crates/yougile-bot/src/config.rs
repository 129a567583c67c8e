//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::errors::{BotError, BotResult};

/// Yandex GPT completion endpoint.
pub const DEFAULT_YANDEX_GPT_URL: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";

/// Model path appended to the folder id in `modelUri`.
pub const DEFAULT_YANDEX_GPT_MODEL: &str = "yandexgpt-lite/latest";

/// YouGile REST API base.
pub const DEFAULT_YOUGILE_API_BASE: &str = "https://ru.yougile.com/api-v2";

/// Default timeout for every outbound HTTP call.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Default prompt file location.
pub const DEFAULT_PROMPTS_PATH: &str = "prompts.json";

pub const ENV_YANDEX_API_KEY: &str = "YANDEX_API_KEY";
pub const ENV_YANDEX_FOLDER_ID: &str = "YANDEX_FOLDER_ID";
pub const ENV_YANDEX_GPT_URL: &str = "YANDEX_GPT_URL";
pub const ENV_YANDEX_GPT_MODEL: &str = "YANDEX_GPT_MODEL";
pub const ENV_YOUGILE_API_KEY: &str = "YOUGILE_API_KEY";
pub const ENV_YOUGILE_COLUMN_ID: &str = "YOUGILE_COLUMN_ID";
pub const ENV_YOUGILE_API_BASE: &str = "YOUGILE_API_BASE";
pub const ENV_API_TIMEOUT_SECS: &str = "BOT_API_TIMEOUT_SECS";
pub const ENV_TEMPERATURE: &str = "BOT_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "BOT_MAX_TOKENS";
pub const ENV_PROMPTS_PATH: &str = "BOT_PROMPTS_PATH";

/// Completion API settings.
#[derive(Debug, Clone)]
pub struct YandexGptConfig {
    pub api_key: Option<String>,
    pub folder_id: Option<String>,
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl YandexGptConfig {
    /// API key, or a configuration error naming the variable.
    pub fn require_api_key(&self) -> BotResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| BotError::missing(ENV_YANDEX_API_KEY))
    }

    /// `gpt://{folder}/{model}`, failing when the folder id is absent.
    pub fn model_uri(&self) -> BotResult<String> {
        let folder_id = self
            .folder_id
            .as_deref()
            .ok_or_else(|| BotError::missing(ENV_YANDEX_FOLDER_ID))?;
        Ok(format!("gpt://{folder_id}/{}", self.model))
    }
}

/// Task API settings.
#[derive(Debug, Clone)]
pub struct YouGileConfig {
    pub api_key: Option<String>,
    /// Destination column. `None` means tasks are analysed but not created.
    pub column_id: Option<String>,
    pub api_base: String,
}

impl YouGileConfig {
    pub fn require_api_key(&self) -> BotResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| BotError::missing(ENV_YOUGILE_API_KEY))
    }
}

/// Full bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub yandex: YandexGptConfig,
    pub yougile: YouGileConfig,
    pub timeout: Duration,
    pub prompts_path: PathBuf,
}

impl BotConfig {
    /// Create configuration from environment variables.
    ///
    /// Credentials are optional here; operations that need them fail with
    /// [`BotError::ConfigurationMissing`] before any network call.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            yandex: YandexGptConfig {
                api_key: non_empty(ENV_YANDEX_API_KEY),
                folder_id: non_empty(ENV_YANDEX_FOLDER_ID),
                url: non_empty(ENV_YANDEX_GPT_URL)
                    .unwrap_or_else(|| DEFAULT_YANDEX_GPT_URL.to_string()),
                model: non_empty(ENV_YANDEX_GPT_MODEL)
                    .unwrap_or_else(|| DEFAULT_YANDEX_GPT_MODEL.to_string()),
                temperature: parse_or(
                    non_empty(ENV_TEMPERATURE),
                    ENV_TEMPERATURE,
                    DEFAULT_TEMPERATURE,
                ),
                max_tokens: parse_or(
                    non_empty(ENV_MAX_TOKENS),
                    ENV_MAX_TOKENS,
                    DEFAULT_MAX_TOKENS,
                ),
            },
            yougile: YouGileConfig {
                api_key: non_empty(ENV_YOUGILE_API_KEY),
                column_id: non_empty(ENV_YOUGILE_COLUMN_ID),
                api_base: non_empty(ENV_YOUGILE_API_BASE)
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_YOUGILE_API_BASE.to_string()),
            },
            timeout: Duration::from_secs(parse_or(
                non_empty(ENV_API_TIMEOUT_SECS),
                ENV_API_TIMEOUT_SECS,
                DEFAULT_API_TIMEOUT_SECS,
            )),
            prompts_path: non_empty(ENV_PROMPTS_PATH)
                .map_or_else(|| PathBuf::from(DEFAULT_PROMPTS_PATH), PathBuf::from),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    raw: Option<String>,
    key: &str,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }),
    }
}
