//! Construction options for client stores.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolOptions;

use crate::errors::ConfigError;

/// Table used when no name is configured
pub const DEFAULT_TABLE_NAME: &str = "oauth2_clients";

/// Default maximum lifetime of a pooled connection
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

/// Default maximum number of open connections
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 50;

/// Default number of idle connections kept for reuse
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 25;

/// Connection pool limits.
///
/// Limits are applied once, when a pool is built from them. A pool handed to a store
/// is never reconfigured, so two stores sharing one pool cannot overwrite each
/// other's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_lifetime: Duration,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_lifetime: DEFAULT_MAX_LIFETIME,
            max_open_conns: DEFAULT_MAX_OPEN_CONNS,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
        }
    }
}

impl PoolSettings {
    /// Open connection limit handed to the pool. A zero limit would leave the pool
    /// unable to hand out any connection, so it falls back to the default.
    pub fn effective_open_conns(&self) -> u32 {
        match self.max_open_conns {
            0 => DEFAULT_MAX_OPEN_CONNS,
            limit => limit,
        }
    }

    /// Idle connections never exceed the open connection limit.
    pub fn effective_idle_conns(&self) -> u32 {
        self.max_idle_conns.min(self.effective_open_conns())
    }

    /// Apply these limits to a pool builder.
    ///
    /// sqlx has no cap on idle connections, so `max_idle_conns` is reported but not
    /// enforced. The pool never opens connections ahead of demand.
    pub fn apply<DB: sqlx::Database>(&self, options: PoolOptions<DB>) -> PoolOptions<DB> {
        options
            .max_connections(self.effective_open_conns())
            .min_connections(0)
            .max_lifetime(self.max_lifetime)
    }

    /// A pool builder with only these limits set
    pub fn pool_options<DB: sqlx::Database>(&self) -> PoolOptions<DB> {
        self.apply(PoolOptions::new())
    }
}

/// Name of the table holding client records.
///
/// Table names are interpolated into statements, so only plain identifiers with an
/// optional single schema qualifier are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE_NAME.to_string())
    }
}

impl TryFrom<String> for TableName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_table_name(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidTableName(value))
        }
    }
}

impl TryFrom<&str> for TableName {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl FromStr for TableName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_table_name(name: &str) -> bool {
    let mut parts = name.split('.');
    let valid = |part: &str| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    };

    match (parts.next(), parts.next(), parts.next()) {
        (Some(table), None, None) => valid(table),
        (Some(schema), Some(table), None) => valid(schema) && valid(table),
        _ => false,
    }
}

/// Options applied when constructing a client store.
///
/// Setters can be chained in any order; calling one twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientStoreOptions {
    table_name: TableName,
    init_table_disabled: bool,
    pool: PoolSettings,
}

impl ClientStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name(mut self, table_name: TableName) -> Self {
        self.table_name = table_name;
        self
    }

    /// Skip the `CREATE TABLE IF NOT EXISTS` statement at construction
    pub fn init_table_disabled(mut self, disabled: bool) -> Self {
        self.init_table_disabled = disabled;
        self
    }

    pub fn max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.pool.max_lifetime = max_lifetime;
        self
    }

    pub fn max_open_conns(mut self, max_open_conns: u32) -> Self {
        self.pool.max_open_conns = max_open_conns;
        self
    }

    pub fn max_idle_conns(mut self, max_idle_conns: u32) -> Self {
        self.pool.max_idle_conns = max_idle_conns;
        self
    }

    pub fn get_table_name(&self) -> &TableName {
        &self.table_name
    }

    pub fn is_init_table_disabled(&self) -> bool {
        self.init_table_disabled
    }

    pub fn pool_settings(&self) -> &PoolSettings {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ClientStoreOptions::default();
        assert_eq!(options.get_table_name().as_ref(), "oauth2_clients");
        assert!(!options.is_init_table_disabled());
        assert_eq!(
            options.pool_settings().max_lifetime,
            Duration::from_secs(7200)
        );
        assert_eq!(options.pool_settings().max_open_conns, 50);
        assert_eq!(options.pool_settings().max_idle_conns, 25);
    }

    #[test]
    fn test_last_setter_wins() {
        let options = ClientStoreOptions::new()
            .table_name("t1".parse().unwrap())
            .max_open_conns(10)
            .table_name("t2".parse().unwrap())
            .max_open_conns(5)
            .init_table_disabled(true)
            .init_table_disabled(false);

        assert_eq!(options.get_table_name().to_string(), "t2");
        assert_eq!(options.pool_settings().max_open_conns, 5);
        assert!(!options.is_init_table_disabled());
    }

    #[test]
    fn test_idle_conns_clamped_to_open() {
        let options = ClientStoreOptions::new()
            .max_open_conns(4)
            .max_idle_conns(25);
        assert_eq!(options.pool_settings().effective_idle_conns(), 4);

        let options = ClientStoreOptions::new();
        assert_eq!(options.pool_settings().effective_idle_conns(), 25);
    }

    #[test]
    fn test_zero_open_conns_falls_back_to_default() {
        let options = ClientStoreOptions::new().max_open_conns(0);
        let settings = options.pool_settings();
        assert_eq!(settings.effective_open_conns(), DEFAULT_MAX_OPEN_CONNS);
        assert_eq!(settings.effective_idle_conns(), DEFAULT_MAX_IDLE_CONNS);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_idle_limit_does_not_prefill_pool() {
        let builder = ClientStoreOptions::new()
            .max_open_conns(10)
            .max_idle_conns(10)
            .pool_settings()
            .pool_options::<sqlx::Sqlite>();
        assert_eq!(builder.get_max_connections(), 10);
        assert_eq!(builder.get_min_connections(), 0);

        let builder = ClientStoreOptions::new()
            .max_open_conns(0)
            .pool_settings()
            .pool_options::<sqlx::Sqlite>();
        assert_eq!(builder.get_max_connections(), DEFAULT_MAX_OPEN_CONNS);
    }

    #[test]
    fn test_table_name_validation() {
        for name in ["oauth2_clients", "t1", "_clients", "auth.clients"] {
            assert!(
                TableName::try_from(name).is_ok(),
                "{name} should be accepted"
            );
        }

        for name in [
            "",
            "1clients",
            "clients; DROP TABLE users",
            "a.b.c",
            "auth.",
            "client-store",
            "\"quoted\"",
        ] {
            assert!(
                matches!(name.parse::<TableName>(), Err(ConfigError::InvalidTableName(_))),
                "{name} should be rejected"
            );
        }
    }
}
