//! Studio configuration from environment variables.
//!
//! All settings have defaults; a variable that is set but unparseable is an
//! error rather than silently falling back.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_CANVAS_SIZE: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// Base URL of the language backend, without a trailing `/`.
    pub backend_url: String,
    /// Catalog entries requested per page.
    pub page_size: u32,
    /// Quiet period before a catalog search is sent.
    pub search_debounce: Duration,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
        }
    }
}

impl StudioConfig {
    /// Read configuration from the process environment, loading `.env` first
    /// when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to load .env");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup("LANGSTUDIO_BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned());

        let config = Self {
            backend_url,
            page_size: parse_var(&lookup, "LANGSTUDIO_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            search_debounce: Duration::from_millis(parse_var(
                &lookup,
                "LANGSTUDIO_SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )?),
            canvas_width: parse_var(&lookup, "LANGSTUDIO_CANVAS_WIDTH", DEFAULT_CANVAS_SIZE)?,
            canvas_height: parse_var(&lookup, "LANGSTUDIO_CANVAS_HEIGHT", DEFAULT_CANVAS_SIZE)?,
        };
        if config.page_size == 0 {
            return Err(ConfigError::Invalid { key: "LANGSTUDIO_PAGE_SIZE", value: "0".to_owned() });
        }
        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
