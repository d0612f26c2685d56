use std::{env, net::SocketAddr};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub database_path: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("TODO_DB_PATH must not be empty")]
    EmptyDatabasePath,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            env::var("BIND_ADDR").ok(),
            env::var("BIND_PORT").ok(),
            env::var("TODO_DB_PATH").ok(),
        )
    }

    fn from_vars(
        bind_addr: Option<String>,
        bind_port: Option<String>,
        database_path: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind_addr = bind_addr.unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = bind_port
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let database_path = match database_path {
            Some(path) => {
                let trimmed = path.trim().to_string();
                if trimmed.is_empty() {
                    return Err(ConfigError::EmptyDatabasePath);
                }
                trimmed
            }
            None => "todos.db".to_string(),
        };

        let config = Self {
            bind_addr,
            bind_port,
            database_path,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let config = Config::from_vars(None, None, None).expect("config should parse");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.database_path, "todos.db");
    }

    #[test]
    fn invalid_port_fails() {
        let err = Config::from_vars(None, Some("99999".to_string()), None)
            .expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn blank_database_path_fails() {
        let err = Config::from_vars(None, None, Some("   ".to_string()))
            .expect_err("expected empty path error");
        assert!(matches!(err, ConfigError::EmptyDatabasePath));
    }

    #[test]
    fn invalid_bind_addr_fails() {
        let err = Config::from_vars(Some("not-an-addr".to_string()), None, None)
            .expect_err("expected invalid socket error");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }

    #[test]
    fn explicit_values_are_used() {
        let config = Config::from_vars(
            Some("0.0.0.0".to_string()),
            Some("9000".to_string()),
            Some("/tmp/todos.db".to_string()),
        )
        .expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.database_path, "/tmp/todos.db");
    }
}
