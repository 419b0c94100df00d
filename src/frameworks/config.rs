use crate::use_cases::OperationSettings;
use serde::Deserialize;
use std::{env, fmt, fs, io, path::PathBuf, time::Duration};
use url::Url;

// Runtime configuration for the battle client. A TOML file supplies defaults and
// environment variables override it.

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3004";
const DEFAULT_CONFIG_FILE: &str = "battle_client.toml";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
const DEFAULT_LOG_ENTRY_DELAY_MS: u64 = 400;
const DEFAULT_AI_THINKING_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_TURNS: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    api_token: Option<String>,
    battle_id: Option<String>,
    request_timeout_ms: Option<u64>,
    log_entry_delay_ms: Option<u64>,
    ai_thinking_delay_ms: Option<u64>,
    max_turns: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub battle_id: String,
    pub request_timeout: Duration,
    pub log_entry_delay: Duration,
    pub ai_thinking_delay: Duration,
    pub max_turns: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidUrl { value: String, source: url::ParseError },
    UnsupportedScheme { value: String },
    MissingBattleId,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            ConfigError::InvalidUrl { value, source } => {
                write!(f, "invalid battle api url {value:?}: {source}")
            }
            ConfigError::UnsupportedScheme { value } => {
                write!(f, "battle api url {value:?} must use http or https")
            }
            ConfigError::MissingBattleId => {
                write!(f, "battle id is required (BATTLE_ID or battle_id in the config file)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    /// Loads the optional config file and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var("BATTLE_CLIENT_CONFIG").ok().map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        // The default file is optional; an explicitly named one must exist.
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) if explicit.is_none() && err.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let file = match contents {
            Some(contents) => toml::from_str::<FileConfig>(&contents)
                .map_err(|source| ConfigError::Parse { path, source })?,
            None => FileConfig::default(),
        };

        Self::resolve(file, |key| env::var(key).ok())
    }

    /// Builds a config from TOML text and an environment lookup.
    pub fn from_sources(
        toml_text: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = toml::from_str::<FileConfig>(toml_text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::resolve(file, lookup)
    }

    fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let millis = |key: &str, from_file: Option<u64>, default: u64| {
            let value = lookup(key)
                .and_then(|value| value.parse::<u64>().ok())
                .or(from_file)
                .unwrap_or(default);
            Duration::from_millis(value)
        };

        let raw_url = lookup("BATTLE_API_URL")
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            value: raw_url.clone(),
            source,
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme { value: raw_url });
        }

        let battle_id = lookup("BATTLE_ID")
            .or(file.battle_id)
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingBattleId)?;

        Ok(Self {
            api_base_url,
            api_token: lookup("BATTLE_API_TOKEN").or(file.api_token),
            battle_id,
            request_timeout: millis(
                "BATTLE_API_TIMEOUT_MS",
                file.request_timeout_ms,
                DEFAULT_REQUEST_TIMEOUT_MS,
            ),
            log_entry_delay: millis(
                "BATTLE_LOG_DELAY_MS",
                file.log_entry_delay_ms,
                DEFAULT_LOG_ENTRY_DELAY_MS,
            ),
            ai_thinking_delay: millis(
                "BATTLE_AI_DELAY_MS",
                file.ai_thinking_delay_ms,
                DEFAULT_AI_THINKING_DELAY_MS,
            ),
            max_turns: lookup("BATTLE_MAX_TURNS")
                .and_then(|value| value.parse().ok())
                .or(file.max_turns)
                .unwrap_or(DEFAULT_MAX_TURNS),
        })
    }

    pub fn operation_settings(&self) -> OperationSettings {
        OperationSettings {
            battle_id: self.battle_id.clone(),
            log_entry_delay: self.log_entry_delay,
            ai_thinking_delay: self.ai_thinking_delay,
        }
    }
}
