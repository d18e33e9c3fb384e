const BACKEND_URL: &str = "TREINO_BACKEND_URL";
const API_KEY: &str = "TREINO_API_KEY";

/// Connection parameters of the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub api_key: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),
}

impl Config {
    pub fn new(backend_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let backend_url = backend_url.trim().trim_end_matches('/');
        let api_key = api_key.trim();

        if backend_url.is_empty() {
            return Err(ConfigError::Missing(BACKEND_URL));
        }
        if !(backend_url.starts_with("https://") || backend_url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(BACKEND_URL));
        }
        if api_key.is_empty() {
            return Err(ConfigError::Missing(API_KEY));
        }

        Ok(Self {
            backend_url: backend_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Reads the parameters embedded at build time.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(option_env!("TREINO_BACKEND_URL"), option_env!("TREINO_API_KEY"))
    }

    fn from_values(backend_url: Option<&str>, api_key: Option<&str>) -> Result<Self, ConfigError> {
        Self::new(
            backend_url.ok_or(ConfigError::Missing(BACKEND_URL))?,
            api_key.ok_or(ConfigError::Missing(API_KEY))?,
        )
    }
}
