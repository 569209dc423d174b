//! Process configuration read from environment variables (a `.env` file is loaded by the binary first).

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "postgres";
pub const DEFAULT_BIND_HOST: &str = "192.168.25.15";
pub const DEFAULT_BIND_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Database connection settings. `url`, when present, takes precedence over the discrete fields.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Per-query timeout. `None` waits on the database indefinitely.
    pub query_timeout: Option<Duration>,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(|e| ConfigError::InvalidUrl(e.to_string()));
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database))
    }

    /// Host and database for log lines; never includes credentials.
    pub fn describe(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub bind_host: String,
    pub bind_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Empty values count as unset; all values except
    /// `DB_PASSWORD` are trimmed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let password = lookup("DB_PASSWORD").filter(|v| !v.is_empty());

        let url = get("DATABASE_URL");
        let (host, password) = if url.is_some() {
            (get("IP_ADDRESS").unwrap_or_default(), password.unwrap_or_default())
        } else {
            (
                get("IP_ADDRESS").ok_or(ConfigError::Missing("IP_ADDRESS"))?,
                password.ok_or(ConfigError::Missing("DB_PASSWORD"))?,
            )
        };

        let db = DbConfig {
            host,
            port: parse_or("DB_PORT", get("DB_PORT"), DEFAULT_DB_PORT)?,
            user: get("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.into()),
            password,
            database: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.into()),
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?,
            acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                get("DB_ACQUIRE_TIMEOUT_SECS"),
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?),
            query_timeout: get("QUERY_TIMEOUT_SECS")
                .map(|v| parse_value::<u64>("QUERY_TIMEOUT_SECS", v))
                .transpose()?
                .map(Duration::from_secs),
        };
        if db.max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }

        Ok(ServerConfig {
            db,
            bind_host: get("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.into()),
            bind_port: parse_or("BIND_PORT", get("BIND_PORT"), DEFAULT_BIND_PORT)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.bind_port)
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { name, value })
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    value.map(|v| parse_value(name, v)).unwrap_or(Ok(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_fixed_deployment_values() {
        let cfg = ServerConfig::from_lookup(lookup(&[("IP_ADDRESS", "10.0.0.5"), ("DB_PASSWORD", "secret")])).unwrap();
        assert_eq!(cfg.db.host, "10.0.0.5");
        assert_eq!(cfg.db.port, 5432);
        assert_eq!(cfg.db.user, "postgres");
        assert_eq!(cfg.db.database, "postgres");
        assert_eq!(cfg.db.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.db.query_timeout, None);
        assert_eq!(cfg.bind_addr(), "192.168.25.15:3000");
    }

    #[test]
    fn missing_host_or_password_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("DB_PASSWORD", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("IP_ADDRESS")));
        let err = ServerConfig::from_lookup(lookup(&[("IP_ADDRESS", "10.0.0.5"), ("DB_PASSWORD", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_PASSWORD")));
    }

    #[test]
    fn database_url_replaces_discrete_fields() {
        let cfg = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:p@db.local:6543/plant")])).unwrap();
        assert!(cfg.db.url.is_some());
        assert_eq!(cfg.db.describe(), "DATABASE_URL");
        assert!(cfg.db.connect_options().is_ok());
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("IP_ADDRESS", "10.0.0.5"),
            ("DB_PASSWORD", "secret"),
            ("BIND_PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BIND_PORT", .. }));

        let err = ServerConfig::from_lookup(lookup(&[
            ("IP_ADDRESS", "10.0.0.5"),
            ("DB_PASSWORD", "secret"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. }));
    }

    #[test]
    fn overrides_and_query_timeout() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("IP_ADDRESS", "10.0.0.5"),
            ("DB_PASSWORD", "secret"),
            ("DB_PORT", "6432"),
            ("BIND_HOST", "0.0.0.0"),
            ("BIND_PORT", "8080"),
            ("QUERY_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(cfg.db.port, 6432);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.db.query_timeout, Some(Duration::from_secs(15)));
        assert_eq!(cfg.db.describe(), "10.0.0.5:6432/postgres");
    }

    #[test]
    fn password_is_taken_verbatim() {
        let cfg = ServerConfig::from_lookup(lookup(&[("IP_ADDRESS", " 10.0.0.5 "), ("DB_PASSWORD", " pass word ")])).unwrap();
        assert_eq!(cfg.db.host, "10.0.0.5");
        assert_eq!(cfg.db.password, " pass word ");

        let cfg = ServerConfig::from_lookup(lookup(&[("IP_ADDRESS", "10.0.0.5"), ("DB_PASSWORD", "   ")])).unwrap();
        assert_eq!(cfg.db.password, "   ");
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = ServerConfig::from_lookup(lookup(&[("IP_ADDRESS", "10.0.0.5"), ("DB_PASSWORD", "hunter2")])).unwrap();
        assert!(!format!("{:?}", cfg).contains("hunter2"));
    }
}
