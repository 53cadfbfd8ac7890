//! Session credentials.

use std::fmt;
use std::time::Duration;

use crate::error::DaemonError;

/// Credentials for the managed host, loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub host: String,
    pub username: String,
    /// Login password. Also piped to sudo for elevation.
    pub secret: String,
    pub port: u16,
    pub connect_timeout: Duration,
}

impl SessionCredentials {
    /// Check that host and username are present.
    pub fn validate(&self) -> Result<(), DaemonError> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("hostname");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DaemonError::Config {
                message: format!("Missing required SSH parameters: {}", missing.join(", ")),
            })
        }
    }

    /// `host:port` for log messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("port", &self.port)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(host: &str, username: &str) -> SessionCredentials {
        SessionCredentials {
            host: host.to_string(),
            username: username.to_string(),
            secret: "s3cret".to_string(),
            port: 22,
            connect_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_validate_requires_host_and_username() {
        assert!(credentials("pi.local", "pi").validate().is_ok());

        let err = credentials("", "").validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("hostname"));
        assert!(message.contains("username"));
    }

    #[test]
    fn test_empty_secret_is_tolerated() {
        let mut creds = credentials("pi.local", "pi");
        creds.secret = String::new();
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", credentials("pi.local", "pi"));
        assert!(!rendered.contains("s3cret"));
        assert_eq!(credentials("pi.local", "pi").address(), "pi.local:22");
    }
}
