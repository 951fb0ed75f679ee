use mailer_strategy_core::NumericMode;
use thiserror::Error;

pub const TRANSPORT_ENV: &str = "MAILER_STRATEGYD_TRANSPORT";
pub const HTTP_ADDR_ENV: &str = "MAILER_STRATEGY_HTTP_ADDR";
pub const NUMERIC_MODE_ENV: &str = "MAILER_STRATEGY_NUMERIC_MODE";

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8788";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MAILER_STRATEGYD_TRANSPORT must be stdio or http, got {0:?}")]
    Transport(String),

    #[error("MAILER_STRATEGY_NUMERIC_MODE must be lenient or strict, got {0:?}")]
    NumericMode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub transport: Transport,
    pub http_addr: String,
    /// Default parsing for raw form fields; a call may override it.
    pub numeric_mode: NumericMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            numeric_mode: NumericMode::Lenient,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let transport = match lookup(TRANSPORT_ENV) {
            None => defaults.transport,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "stdio" => Transport::Stdio,
                "http" => Transport::Http,
                _ => return Err(ConfigError::Transport(raw)),
            },
        };

        let http_addr = lookup(HTTP_ADDR_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.http_addr);

        let numeric_mode = match lookup(NUMERIC_MODE_ENV) {
            None => defaults.numeric_mode,
            Some(raw) => raw
                .parse::<NumericMode>()
                .map_err(|_| ConfigError::NumericMode(raw))?,
        };

        Ok(Self {
            transport,
            http_addr,
            numeric_mode,
        })
    }
}
