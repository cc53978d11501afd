//! Server settings from the environment and the game configuration file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use questline_registry::application::persistence::DEFAULT_STATE_KEY;
use questline_registry::domain::config::GameConfig;

use crate::error::AppError;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default path of the game configuration file.
pub const DEFAULT_GAME_CONFIG: &str = "questline.yaml";

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `PostgreSQL` connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Game configuration file (`QUESTLINE_CONFIG`).
    pub game_config: PathBuf,
    /// Key the snapshot is stored under (`QUESTLINE_STATE_KEY`).
    pub state_key: String,
}

impl ServerConfig {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is unset or `PORT` is not
    /// a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, applying defaults for anything
    /// optional.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".into())
        })?;
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            game_config: lookup("QUESTLINE_CONFIG")
                .map_or_else(|| PathBuf::from(DEFAULT_GAME_CONFIG), PathBuf::from),
            state_key: lookup("QUESTLINE_STATE_KEY")
                .unwrap_or_else(|| DEFAULT_STATE_KEY.to_owned()),
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

/// Parses and validates a YAML game configuration.
///
/// # Errors
///
/// Returns `AppError::Config` if the YAML is malformed or the configuration
/// fails validation.
pub fn parse_game_config(raw: &str) -> Result<GameConfig, AppError> {
    let config: GameConfig = serde_yaml::from_str(raw)
        .map_err(|e| AppError::Config(format!("malformed game configuration: {e}")))?;
    config
        .validate()
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(config)
}

/// Reads the game configuration file at `path`.
///
/// # Errors
///
/// Returns `AppError::Config` if the file cannot be read or is invalid.
pub fn load_game_config(path: &Path) -> Result<GameConfig, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse_game_config(&raw)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_database_url_is_set() {
        // Arrange
        let env = lookup(&[("DATABASE_URL", "postgres://localhost/questline")]);

        // Act
        let config = ServerConfig::from_lookup(env).unwrap();

        // Assert
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.game_config, PathBuf::from(DEFAULT_GAME_CONFIG));
        assert_eq!(config.state_key, DEFAULT_STATE_KEY);
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_missing_database_url_is_a_config_error() {
        let result = ServerConfig::from_lookup(lookup(&[]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let env = lookup(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]);

        let result = ServerConfig::from_lookup(env);

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_overrides_are_read() {
        let env = lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("QUESTLINE_CONFIG", "/etc/questline/game.yaml"),
            ("QUESTLINE_STATE_KEY", "questline:spring"),
        ]);

        let config = ServerConfig::from_lookup(env).unwrap();

        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.game_config, PathBuf::from("/etc/questline/game.yaml"));
        assert_eq!(config.state_key, "questline:spring");
    }

    #[test]
    fn test_parse_game_config_reads_yaml() {
        // Arrange
        let raw = r"
locations:
  - name: Plov-Center
    stations: 2
  - name: Harbor
    stations: 1
caretakers:
  care-p1: Plov-Center-1
  1234567: Harbor-1
admins:
  - admin
";

        // Act
        let config = parse_game_config(raw).unwrap();

        // Assert
        assert_eq!(config.station_count(), 3);
        assert_eq!(config.caretakers.len(), 2);
        assert_eq!(config.admins.len(), 1);
    }

    #[test]
    fn test_parse_game_config_rejects_unknown_caretaker_station() {
        let raw = r"
locations:
  - name: A
    stations: 1
caretakers:
  care-x: A-2
";

        let result = parse_game_config(raw);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_game_config_rejects_malformed_yaml() {
        let result = parse_game_config("locations: [");

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("malformed")));
    }
}
