use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed browser origin (`FRONTEND_URL`). Unset means any origin.
    pub frontend_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty string counts as unset, same as a missing variable.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server = ServerConfig {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match get("PORT") {
                Some(raw) => parse_port("PORT", &raw)?,
                None => 3000,
            },
        };

        let database = DatabaseConfig {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: match get("DB_PORT") {
                Some(raw) => parse_port("DB_PORT", &raw)?,
                None => 5432,
            },
            name: get("DB_NAME").ok_or(ConfigError::MissingVar("DB_NAME"))?,
            user: get("DB_USER").ok_or(ConfigError::MissingVar("DB_USER"))?,
            password: get("DB_PASSWORD").ok_or(ConfigError::MissingVar("DB_PASSWORD"))?,
        };

        let cors = CorsConfig {
            frontend_origin: get("FRONTEND_URL"),
        };

        Ok(Self {
            server,
            database,
            cors,
        })
    }
}

fn parse_port(var: &'static str, raw: &str) -> Result<u16, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: raw.to_string(),
    })
}
