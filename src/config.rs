//! Environment-based configuration for client store construction.

use anyhow::Result;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::storage::options::{
    ClientStoreOptions, DEFAULT_MAX_IDLE_CONNS, DEFAULT_MAX_OPEN_CONNS, DEFAULT_TABLE_NAME,
    TableName,
};

/// Client table initialization toggle
#[derive(Clone, Debug)]
pub struct InitTableDisabled(bool);

/// Maximum lifetime of a pooled connection
#[derive(Clone, Debug)]
pub struct MaxLifetime(Duration);

/// Connection count limit (open or idle)
#[derive(Clone, Debug)]
pub struct ConnectionCount(u32);

/// Open connection limit, always at least one
#[derive(Clone, Debug)]
pub struct MaxOpenConns(ConnectionCount);

/// Main application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub table_name: TableName,
    pub init_table_disabled: InitTableDisabled,
    pub max_lifetime: MaxLifetime,
    pub max_open_conns: MaxOpenConns,
    pub max_idle_conns: ConnectionCount,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let database_url = optional_env("DATABASE_URL");
        let table_name: TableName =
            default_env("CLIENT_STORE_TABLE_NAME", DEFAULT_TABLE_NAME).try_into()?;
        let init_table_disabled: InitTableDisabled =
            default_env("CLIENT_STORE_INIT_TABLE_DISABLED", "false").try_into()?;
        let max_lifetime: MaxLifetime = default_env("CLIENT_STORE_MAX_LIFETIME", "2h").try_into()?;
        let max_open_conns: MaxOpenConns = default_env(
            "CLIENT_STORE_MAX_OPEN_CONNS",
            &DEFAULT_MAX_OPEN_CONNS.to_string(),
        )
        .try_into()?;
        let max_idle_conns: ConnectionCount = default_env(
            "CLIENT_STORE_MAX_IDLE_CONNS",
            &DEFAULT_MAX_IDLE_CONNS.to_string(),
        )
        .try_into()?;

        Ok(Self {
            storage_backend,
            database_url,
            table_name,
            init_table_disabled,
            max_lifetime,
            max_open_conns,
            max_idle_conns,
        })
    }

    /// Store construction options described by this configuration
    pub fn store_options(&self) -> ClientStoreOptions {
        ClientStoreOptions::new()
            .table_name(self.table_name.clone())
            .init_table_disabled(*self.init_table_disabled.as_ref())
            .max_lifetime(*self.max_lifetime.as_ref())
            .max_open_conns(*self.max_open_conns.as_ref())
            .max_idle_conns(*self.max_idle_conns.as_ref())
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn default_env(name: &str, default_value: &str) -> String {
    optional_env(name).unwrap_or_else(|| default_value.to_string())
}

impl TryFrom<String> for InitTableDisabled {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Self(true)),
            "false" | "0" | "no" | "off" => Ok(Self(false)),
            _ => Err(ConfigError::BoolParsingFailed(value).into()),
        }
    }
}

impl AsRef<bool> for InitTableDisabled {
    fn as_ref(&self) -> &bool {
        &self.0
    }
}

impl TryFrom<String> for MaxLifetime {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let duration = duration_str::parse(&value)
            .map_err(|e| ConfigError::DurationParsingFailed(value, e.to_string()))?;
        Ok(Self(duration))
    }
}

impl AsRef<Duration> for MaxLifetime {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for ConnectionCount {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|err| ConfigError::ConnectionCountParsingFailed(value, err).into())
    }
}

impl AsRef<u32> for ConnectionCount {
    fn as_ref(&self) -> &u32 {
        &self.0
    }
}

impl TryFrom<String> for MaxOpenConns {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let count = ConnectionCount::try_from(value)?;
        if count.0 == 0 {
            return Err(ConfigError::ZeroMaxOpenConns.into());
        }
        Ok(Self(count))
    }
}

impl AsRef<u32> for MaxOpenConns {
    fn as_ref(&self) -> &u32 {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_table_disabled_parsing() {
        for value in ["true", "1", "YES", "on"] {
            let parsed = InitTableDisabled::try_from(value.to_string()).unwrap();
            assert!(*parsed.as_ref(), "{value} should parse as true");
        }
        for value in ["false", "0", "no", "OFF"] {
            let parsed = InitTableDisabled::try_from(value.to_string()).unwrap();
            assert!(!*parsed.as_ref(), "{value} should parse as false");
        }

        let err = InitTableDisabled::try_from("maybe".to_string()).unwrap_err();
        assert!(err.to_string().contains("error-sqlstore-config-3"));
    }

    #[test]
    fn test_max_lifetime_parsing() {
        let lifetime = MaxLifetime::try_from("2h".to_string()).unwrap();
        assert_eq!(*lifetime.as_ref(), Duration::from_secs(7200));

        let lifetime = MaxLifetime::try_from("90s".to_string()).unwrap();
        assert_eq!(*lifetime.as_ref(), Duration::from_secs(90));

        let err = MaxLifetime::try_from("forever".to_string()).unwrap_err();
        assert!(err.to_string().contains("error-sqlstore-config-1"));
    }

    #[test]
    fn test_connection_count_parsing() {
        let count = ConnectionCount::try_from("50".to_string()).unwrap();
        assert_eq!(*count.as_ref(), 50);

        let err = ConnectionCount::try_from("-1".to_string()).unwrap_err();
        assert!(err.to_string().contains("error-sqlstore-config-2"));

        let idle = ConnectionCount::try_from("0".to_string()).unwrap();
        assert_eq!(*idle.as_ref(), 0);
    }

    #[test]
    fn test_max_open_conns_rejects_zero() {
        let open = MaxOpenConns::try_from("10".to_string()).unwrap();
        assert_eq!(*open.as_ref(), 10);

        let err = MaxOpenConns::try_from("0".to_string()).unwrap_err();
        assert!(err.to_string().contains("error-sqlstore-config-7"));

        let err = MaxOpenConns::try_from("many".to_string()).unwrap_err();
        assert!(err.to_string().contains("error-sqlstore-config-2"));
    }

    #[test]
    fn test_store_options_from_config() {
        let config = Config {
            storage_backend: "sqlite".to_string(),
            database_url: Some("sqlite::memory:".to_string()),
            table_name: "t1".parse().unwrap(),
            init_table_disabled: InitTableDisabled(true),
            max_lifetime: MaxLifetime(Duration::from_secs(60)),
            max_open_conns: MaxOpenConns(ConnectionCount(10)),
            max_idle_conns: ConnectionCount(5),
        };

        let options = config.store_options();
        assert_eq!(options.get_table_name().as_ref(), "t1");
        assert!(options.is_init_table_disabled());
        assert_eq!(options.pool_settings().max_lifetime, Duration::from_secs(60));
        assert_eq!(options.pool_settings().max_open_conns, 10);
        assert_eq!(options.pool_settings().max_idle_conns, 5);
    }
}
