use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_stored_responses: usize,
    pub fetch_timeout: Duration,
    pub max_body_bytes: usize,
    pub rate_limit_per_second: u32,
    pub rate_limit_burst: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_stored_responses: 1000,
            fetch_timeout: Duration::from_secs(10),
            max_body_bytes: 1024 * 100,
            rate_limit_per_second: 20,
            rate_limit_burst: 40,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_var("PORT", defaults.port)?;
        let max_stored_responses = positive("MAX_STORED_RESPONSES", defaults.max_stored_responses)?;
        let fetch_timeout_secs = positive("FETCH_TIMEOUT_SECS", defaults.fetch_timeout.as_secs())?;
        let max_body_bytes = positive("MAX_BODY_BYTES", defaults.max_body_bytes)?;
        let rate_limit_per_second = positive("RATE_LIMIT_PER_SECOND", defaults.rate_limit_per_second)?;
        let rate_limit_burst = positive("RATE_LIMIT_BURST", defaults.rate_limit_burst)?;

        Ok(Self {
            host,
            port,
            max_stored_responses,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_body_bytes,
            rate_limit_per_second,
            rate_limit_burst,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}

fn positive<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
{
    let value = parse_var(name, default)?;
    if value == T::default() {
        return Err(ConfigError::Zero(name));
    }
    Ok(value)
}
