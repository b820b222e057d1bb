//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use common::pagination;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// API configuration.
    pub api: Api,

    /// Session configuration.
    pub session: Session,

    /// Lists configuration.
    pub list: List,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL of the API.
    #[default("https://nachos-backend-production.up.railway.app/api/v1".to_owned())]
    pub base_url: String,

    /// Maximum duration of a single request.
    #[default(client::Config::DEFAULT_TIMEOUT)]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl TryFrom<Api> for client::Config {
    type Error = <client::Url as std::str::FromStr>::Err;

    fn try_from(value: Api) -> Result<Self, Self::Error> {
        let Api { base_url, timeout } = value;

        Ok(Self {
            timeout,
            ..Self::new(base_url.parse()?)
        })
    }
}

/// Session configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Path of the file persisting the session tokens.
    #[default(PathBuf::from(".nachos/session.json"))]
    pub storage: PathBuf,
}

/// Lists configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct List {
    /// Number of items per page.
    #[default(10)]
    pub page_size: u32,

    /// Quiet period after the last search input before it's applied.
    #[default(time::Duration::from_millis(500))]
    #[serde(with = "humantime_serde")]
    pub search_debounce: time::Duration,

    /// Filter value meaning "don't filter by this key".
    #[default("all".to_owned())]
    pub no_filter: String,

    /// Indicator whether to fetch the first page right away.
    #[default(true)]
    pub auto_fetch: bool,
}

impl From<List> for client::paged::Config {
    fn from(value: List) -> Self {
        let List {
            page_size,
            search_debounce,
            no_filter,
            auto_fetch,
        } = value;

        Self {
            page_size: pagination::Size::new(page_size).unwrap_or_default(),
            search_debounce,
            no_filter,
            auto_fetch,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{Api, List};

    #[test]
    fn converts_api_section() {
        let config = client::Config::try_from(Api {
            base_url: "https://api.test/v1".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://api.test/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.endpoints.login, "/auth/login/");

        assert!(client::Config::try_from(Api {
            base_url: "not a url".into(),
            ..Api::default()
        })
        .is_err());
    }

    #[test]
    fn converts_list_section() {
        let config = client::paged::Config::from(List {
            page_size: 0,
            ..List::default()
        });

        assert_eq!(config.page_size.get(), 10);
        assert_eq!(config.search_debounce, Duration::from_millis(500));
        assert_eq!(config.no_filter, "all");
        assert!(config.auto_fetch);
    }
}
