use std::path::PathBuf;
use std::time::Duration;

use chatgpt::config::ChatGPTEngine;
use thiserror::Error;

use crate::quiz::ai_helper::Personality;
use crate::quiz::report::FallbackPolicy;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },

    #[error("Unknown CHATGPT_ENGINE '{0}'")]
    UnknownEngine(String),

    #[error("Unknown COACH_PERSONALITY '{0}'")]
    UnknownPersonality(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Without a key every run gets the fallback report.
    pub chatgpt_api_key: Option<String>,
    pub engine: ChatGPTEngine,
    pub personality: Personality,
    pub report_timeout: Duration,
    pub fallback: FallbackPolicy,
    pub progress_tick: Duration,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let engine = match get("CHATGPT_ENGINE").as_deref().map(str::trim) {
            None | Some("gpt-3.5-turbo") => ChatGPTEngine::Gpt35Turbo,
            Some("gpt-4") => ChatGPTEngine::Gpt4,
            Some("gpt-4-32k") => ChatGPTEngine::Gpt4_32k,
            Some(other) => return Err(ConfigError::UnknownEngine(other.to_string())),
        };

        let personality = match get("COACH_PERSONALITY") {
            None => Personality::Stern,
            Some(name) => {
                Personality::from_name(&name).ok_or(ConfigError::UnknownPersonality(name))?
            }
        };

        let report_timeout =
            Duration::from_secs(positive(get("REPORT_TIMEOUT_SECS"), "REPORT_TIMEOUT_SECS", 30)?);
        let progress_tick =
            Duration::from_millis(positive(get("PROGRESS_TICK_MS"), "PROGRESS_TICK_MS", 1000)?);

        let mut fallback = FallbackPolicy::default();
        if let Some(value) = get("FALLBACK_STRONG_THRESHOLD") {
            fallback.strong_threshold = parse(&value, "FALLBACK_STRONG_THRESHOLD")?;
        }

        Ok(Self {
            chatgpt_api_key: get("CHATGPT_API_KEY"),
            engine,
            personality,
            report_timeout,
            fallback,
            progress_tick,
            catalog_path: get("QUIZ_CATALOG_PATH").map(PathBuf::from),
        })
    }
}

fn parse<T: std::str::FromStr>(value: &str, key: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        key,
        value: value.to_string(),
    })
}

fn positive(value: Option<String>, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => match parse::<u64>(&value, key)? {
            0 => Err(ConfigError::Zero { key }),
            n => Ok(n),
        },
    }
}
