use chrono::Duration;
use std::env;
use std::path::Path;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";
    /// HMAC secret used to sign access tokens. Required.
    pub const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";
    pub const REGISTER_TOKEN_TTL_MINUTES: &str = "REGISTER_TOKEN_TTL_MINUTES";
    pub const LOGIN_TOKEN_TTL_MINUTES: &str = "LOGIN_TOKEN_TTL_MINUTES";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8000;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/notekeep.db";
    pub const DATABASE_POOL_SIZE: u32 = 8;
    /// Tokens handed out at registration are short-lived.
    pub const REGISTER_TOKEN_TTL_MINUTES: i64 = 30;
    /// Tokens handed out at login last 25 days.
    pub const LOGIN_TOKEN_TTL_MINUTES: i64 = 36_000;
    /// Upper bound accepted for either token TTL (ten years).
    pub const MAX_TOKEN_TTL_MINUTES: i64 = 10 * 365 * 24 * 60;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub database_pool_size: u32,
    pub access_token_secret: String,
    pub register_token_ttl: Duration,
    pub login_token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token_secret = lookup(env_vars::ACCESS_TOKEN_SECRET)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(env_vars::ACCESS_TOKEN_SECRET))?;

        Ok(Self {
            port: parse_or(&lookup, env_vars::PORT, defaults::PORT)?,
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            database_pool_size: parse_or(
                &lookup,
                env_vars::DATABASE_POOL_SIZE,
                defaults::DATABASE_POOL_SIZE,
            )?,
            access_token_secret,
            register_token_ttl: parse_ttl(
                &lookup,
                env_vars::REGISTER_TOKEN_TTL_MINUTES,
                defaults::REGISTER_TOKEN_TTL_MINUTES,
            )?,
            login_token_ttl: parse_ttl(
                &lookup,
                env_vars::LOGIN_TOKEN_TTL_MINUTES,
                defaults::LOGIN_TOKEN_TTL_MINUTES,
            )?,
        })
    }

    /// Config used by unit tests: in-memory store, fixed secret, default TTLs.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: "127.0.0.1".to_string(),
            database_url: ":memory:".to_string(),
            database_pool_size: 1,
            access_token_secret: "test-access-token-secret".to_string(),
            register_token_ttl: Duration::minutes(defaults::REGISTER_TOKEN_TTL_MINUTES),
            login_token_ttl: Duration::minutes(defaults::LOGIN_TOKEN_TTL_MINUTES),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        None => Ok(default),
    }
}

/// A token lifetime in minutes, between one minute and
/// `defaults::MAX_TOKEN_TTL_MINUTES`.
fn parse_ttl<F>(lookup: &F, name: &'static str, default: i64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let minutes = parse_or(lookup, name, default)?;
    (1..=defaults::MAX_TOKEN_TTL_MINUTES)
        .contains(&minutes)
        .then(|| Duration::try_minutes(minutes))
        .flatten()
        .ok_or_else(|| ConfigError::Invalid {
            name,
            value: minutes.to_string(),
        })
}

/// Create the parent directory of a file-backed database so a fresh checkout
/// can start without manual setup.
pub fn initialize_data_dir(database_url: &str) -> std::io::Result<()> {
    if database_url == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
            log::info!("Database directory: {:?}", parent);
        }
    }
    Ok(())
}
