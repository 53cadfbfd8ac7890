//! Configuration settings for the service control daemon.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DaemonError;
use crate::session::SessionCredentials;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/svcctl/daemon.toml";

/// Main configuration structure for the daemon.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where these settings came from.
    #[serde(skip)]
    pub source: ConfigSource,
}

/// Origin of the loaded settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from a TOML file.
    File(PathBuf),
    /// No file was found; built-in defaults were used.
    #[default]
    Defaults,
}

/// Connection settings for the managed host.
#[derive(Clone, Deserialize)]
pub struct SshConfig {
    /// Host name or address of the managed host.
    #[serde(default)]
    pub host: String,
    /// Login user on the managed host.
    #[serde(default = "default_username")]
    pub username: String,
    /// Login password, also used for sudo elevation.
    #[serde(default)]
    pub password: String,
    /// SSH port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect and authentication timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Per-command timeout in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
}

impl fmt::Debug for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("port", &self.port)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("command_timeout_seconds", &self.command_timeout_seconds)
            .finish()
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: default_username(),
            password: String::new(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            command_timeout_seconds: default_command_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_username() -> String {
    "pi".to_string()
}

fn default_port() -> u16 {
    22
}

fn default_timeout() -> u64 {
    10
}

fn default_command_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    /// Load settings from a TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error: the built-in defaults are used and
    /// `source` is set to [`ConfigSource::Defaults`]. The result is validated,
    /// so an empty host or username fails here rather than per request.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DaemonError> {
        let mut settings = Self::from_file(path.as_ref())?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read the TOML file without overrides or validation.
    fn from_file(path: &Path) -> Result<Self, DaemonError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| DaemonError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let mut settings: Settings = toml::from_str(&content).map_err(|e| DaemonError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;
        settings.source = ConfigSource::File(path.to_path_buf());

        Ok(settings)
    }

    /// Apply `SVCCTL_*` overrides from the given lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DaemonError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SVCCTL_SSH_HOST") {
            self.ssh.host = host;
        }
        if let Some(username) = lookup("SVCCTL_SSH_USERNAME") {
            self.ssh.username = username;
        }
        if let Some(password) = lookup("SVCCTL_SSH_PASSWORD") {
            self.ssh.password = password;
        }
        if let Some(port) = lookup("SVCCTL_SSH_PORT") {
            self.ssh.port = parse_override("SVCCTL_SSH_PORT", &port)?;
        }
        if let Some(timeout) = lookup("SVCCTL_SSH_TIMEOUT") {
            self.ssh.timeout_seconds = parse_override("SVCCTL_SSH_TIMEOUT", &timeout)?;
        }
        if let Some(level) = lookup("SVCCTL_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), DaemonError> {
        let mut missing = Vec::new();
        if self.ssh.host.trim().is_empty() {
            missing.push("host");
        }
        if self.ssh.username.trim().is_empty() {
            missing.push("username");
        }
        if !missing.is_empty() {
            return Err(DaemonError::Config {
                message: format!("Missing required SSH parameters: {}", missing.join(", ")),
            });
        }

        if self.ssh.timeout_seconds == 0 || self.ssh.command_timeout_seconds == 0 {
            return Err(DaemonError::Config {
                message: "SSH timeouts must be greater than zero".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(DaemonError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(DaemonError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }

    /// Session credentials for the managed host.
    pub fn credentials(&self) -> SessionCredentials {
        SessionCredentials {
            host: self.ssh.host.clone(),
            username: self.ssh.username.clone(),
            secret: self.ssh.password.clone(),
            port: self.ssh.port,
            connect_timeout: Duration::from_secs(self.ssh.timeout_seconds),
        }
    }

    /// Per-command timeout.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.ssh.command_timeout_seconds)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DaemonError> {
    value.trim().parse().map_err(|_| DaemonError::Config {
        message: format!("Invalid value '{}' for {}", value, key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.ssh.username, "pi");
        assert_eq!(settings.ssh.port, 22);
        assert_eq!(settings.ssh.timeout_seconds, 10);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "pretty");
        assert_eq!(settings.source, ConfigSource::Defaults);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::from_file(Path::new("/nonexistent/svcctl.toml")).unwrap();
        assert!(settings.ssh.host.is_empty());
        assert_eq!(settings.source, ConfigSource::Defaults);
        // Defaults have no host, so validation rejects them at startup.
        assert!(matches!(settings.validate(), Err(DaemonError::Config { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[ssh]
host = "raspberrypi.local"
username = "admin"
password = "hunter2"
port = 2222

[logging]
level = "debug"
format = "json"
"#,
        );

        let settings = Settings::from_file(file.path()).unwrap();
        settings.validate().unwrap();
        assert_eq!(settings.ssh.host, "raspberrypi.local");
        assert_eq!(settings.ssh.username, "admin");
        assert_eq!(settings.ssh.port, 2222);
        assert_eq!(settings.ssh.timeout_seconds, 10);
        assert_eq!(settings.logging.format, "json");
        assert_eq!(settings.source, ConfigSource::File(file.path().to_path_buf()));

        let creds = settings.credentials();
        assert_eq!(creds.secret, "hunter2");
        assert_eq!(creds.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let file = write_config("[ssh\nhost = ");
        assert!(matches!(
            Settings::from_file(file.path()),
            Err(DaemonError::Config { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SVCCTL_SSH_HOST", "10.0.0.5"),
            ("SVCCTL_SSH_PORT", "2200"),
            ("SVCCTL_LOG_LEVEL", "warn"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.ssh.host, "10.0.0.5");
        assert_eq!(settings.ssh.port, 2200);
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_override() {
        let mut settings = Settings::default();
        let result = settings.apply_overrides(|key| {
            (key == "SVCCTL_SSH_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(DaemonError::Config { .. })));
    }

    #[test]
    fn test_empty_username_rejected() {
        let mut settings = Settings::default();
        settings.ssh.host = "pi.local".to_string();
        settings.ssh.username = String::new();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let mut settings = Settings::default();
        settings.ssh.host = "pi.local".to_string();
        settings.logging.format = "xml".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut settings = Settings::default();
        settings.ssh.password = "hunter2".to_string();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
