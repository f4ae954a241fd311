use log::info;
use roster_states::snapshot_state;
use serde::Deserialize;
use thiserror::Error;
use ustr::Ustr;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: usize = 10;
const ENV_PREFIX: &str = "ROSTER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read roster configuration from environment: {0}")]
    Env(#[from] serde_env::Error),
    #[error("ROSTER_PAGE_SIZE must be greater than zero")]
    ZeroPageSize,
}

/// Variables read from the environment, with the `ROSTER_` prefix stripped.
#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    institute_id: Option<String>,
    page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    pub institute_id: String,
    pub page_size: usize,
}

snapshot_state!(BusinessConfig);

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn with_institute(mut self, institute_id: impl Into<String>) -> Self {
        self.institute_id = institute_id.into();
        self
    }

    /// Reads `ROSTER_API_BASE_URL`, `ROSTER_INSTITUTE_ID` and
    /// `ROSTER_PAGE_SIZE`. Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|k| (k.to_string(), value.as_ref().to_string()))
            })
            .collect();
        let raw: RawConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let page_size = raw.page_size.unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let config = Self {
            api_base_url: raw
                .api_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            institute_id: raw.institute_id.unwrap_or(defaults.institute_id),
            page_size,
        };
        info!(
            "BusinessConfig: api={} institute={:?} page_size={}",
            config.api_base_url, config.institute_id, config.page_size
        );
        Ok(config)
    }

    /// Root of every REST endpoint.
    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url))
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            institute_id: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
