use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants;
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub query: String,
    pub num_results: u32,
    pub lookback_hours: u32,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            query: constants::search::DEFAULT_QUERY.to_string(),
            num_results: constants::search::DEFAULT_NUM_RESULTS,
            lookback_hours: constants::search::DEFAULT_LOOKBACK_HOURS,
            timeout_secs: constants::search::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    pub max_articles: usize,
    pub temperature: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_articles: constants::analysis::DEFAULT_MAX_ARTICLES,
            temperature: constants::analysis::DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub max_citations: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: constants::report::DEFAULT_TITLE.to_string(),
            max_citations: constants::report::DEFAULT_MAX_CITATIONS,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelegramSettings {
    pub parse_mode: String,
    pub timeout_secs: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            parse_mode: constants::telegram::DEFAULT_PARSE_MODE.to_string(),
            timeout_secs: constants::telegram::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Non-secret tunables, read from `config.yaml` when present.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub analysis: AnalysisSettings,
    pub report: ReportSettings,
    pub telegram: TelegramSettings,
    /// Cron expression for scheduled mode
    pub schedule: Option<String>,
}

impl Settings {
    /// Load settings from `path`. A missing `config.yaml` yields the defaults;
    /// any other missing path was asked for explicitly and is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_display = path.display().to_string();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && path == Path::new(constants::DEFAULT_CONFIG_PATH) => {
                debug!("No {} found, using default settings", path_display);
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path_display, source }),
        };
        Self::from_yaml(&content, &path_display)
    }

    pub fn from_yaml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.query.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "search.query",
                reason: "must not be empty".to_string(),
            });
        }
        if self.search.num_results == 0 {
            return Err(ConfigError::Invalid {
                key: "search.num_results",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search.lookback_hours == 0 {
            return Err(ConfigError::Invalid {
                key: "search.lookback_hours",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.analysis.max_articles == 0 {
            return Err(ConfigError::Invalid {
                key: "analysis.max_articles",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct SerperConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct LlmConfig {
    /// Env var the key came from, for logs
    pub provider: &'static str,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

impl fmt::Debug for SerperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Immutable configuration for one process, passed into each component.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub settings: Settings,
    pub serper: SerperConfig,
    /// `None` only when delivery is disabled
    pub telegram: Option<TelegramConfig>,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load from the process environment (after `.env`) and the settings file.
    pub fn load(settings_path: &Path, require_telegram: bool) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let settings = Settings::load(settings_path)?;
        Self::from_lookup(settings, |key| std::env::var(key).ok(), require_telegram)
    }

    /// Build from an arbitrary variable lookup. Blank values count as absent.
    pub fn from_lookup<F>(settings: Settings, lookup: F, require_telegram: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| read_var(&lookup, key);

        let serper = resolve_serper(&get)?;
        let telegram = match resolve_telegram(&get) {
            Ok(telegram) => Some(telegram),
            Err(e) if require_telegram => return Err(e),
            Err(_) => None,
        };
        let llm = resolve_llm(&get)?;

        Ok(Self {
            settings,
            serper,
            telegram,
            llm,
        })
    }

    /// Telegram credentials, or the error the loader would have raised.
    pub fn telegram(&self) -> Result<&TelegramConfig, ConfigError> {
        self.telegram
            .as_ref()
            .ok_or(ConfigError::MissingVar("TELEGRAM_BOT_TOKEN"))
    }
}

/// Credentials resolved one by one for the health check, so a missing key
/// fails its own check instead of aborting the load.
#[derive(Debug)]
pub struct CheckedConfig {
    pub settings: Settings,
    pub serper: Result<SerperConfig, ConfigError>,
    pub telegram: Result<TelegramConfig, ConfigError>,
    pub llm: Result<LlmConfig, ConfigError>,
}

impl CheckedConfig {
    /// Only an unreadable settings file is an error here.
    pub fn load(settings_path: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let settings = Settings::load(settings_path)?;
        Ok(Self::from_lookup(settings, |key| std::env::var(key).ok()))
    }

    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| read_var(&lookup, key);

        Self {
            settings,
            serper: resolve_serper(&get),
            telegram: resolve_telegram(&get),
            llm: resolve_llm(&get),
        }
    }
}

fn read_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resolve_serper<G>(get: &G) -> Result<SerperConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    Ok(SerperConfig {
        api_key: get("SERPER_API_KEY").ok_or(ConfigError::MissingVar("SERPER_API_KEY"))?,
        base_url: get("SERPER_BASE_URL").unwrap_or_else(|| constants::search::DEFAULT_BASE_URL.to_string()),
    })
}

fn resolve_telegram<G>(get: &G) -> Result<TelegramConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    Ok(TelegramConfig {
        bot_token: get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::MissingVar("TELEGRAM_BOT_TOKEN"))?,
        chat_id: get("TELEGRAM_CHAT_ID").ok_or(ConfigError::MissingVar("TELEGRAM_CHAT_ID"))?,
        api_base: get("TELEGRAM_API_BASE").unwrap_or_else(|| constants::telegram::DEFAULT_API_BASE.to_string()),
    })
}

/// Provider precedence: LLM_API_KEY, then GLM, Gemini, OpenAI.
fn resolve_llm<G>(get: &G) -> Result<LlmConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let model_override = get("LLM_MODEL");

    let mut llm = if let Some(api_key) = get("LLM_API_KEY") {
        LlmConfig {
            provider: "LLM_API_KEY",
            api_key,
            base_url: get("LLM_BASE_URL"),
            model: constants::llm::OPENAI_MODEL.to_string(),
        }
    } else if let Some(api_key) = get("GLM_API_KEY") {
        LlmConfig {
            provider: "GLM_API_KEY",
            api_key,
            base_url: Some(constants::llm::GLM_BASE_URL.to_string()),
            model: constants::llm::GLM_MODEL.to_string(),
        }
    } else if let Some(api_key) = get("GEMINI_API_KEY") {
        LlmConfig {
            provider: "GEMINI_API_KEY",
            api_key,
            base_url: Some(constants::llm::GEMINI_BASE_URL.to_string()),
            model: constants::llm::GEMINI_MODEL.to_string(),
        }
    } else if let Some(api_key) = get("OPENAI_API_KEY") {
        LlmConfig {
            provider: "OPENAI_API_KEY",
            api_key,
            base_url: None,
            model: constants::llm::OPENAI_MODEL.to_string(),
        }
    } else {
        return Err(ConfigError::NoLlmProvider(constants::llm::PROVIDER_VARS));
    };

    if let Some(model) = model_override {
        llm.model = model;
    }
    Ok(llm)
}
