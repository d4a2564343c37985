pub mod config;
pub mod database;

pub use config::{Config, ConfigError, CorsConfig, DatabaseConfig, ServerConfig};
pub use database::Database;
