//! Unit name sanitization.
//!
//! Every identifier placed into a remote command string passes through one
//! of the types here. Path separators are replaced with a placeholder; that
//! replacement plus suffix enforcement is the only transformation applied,
//! so names containing shell metacharacters reach the remote shell
//! unchanged (see DESIGN.md, "Command injection").

use std::fmt;

use crate::error::{DaemonError, ValidationErrorKind};

/// Canonical suffix of service units.
pub const UNIT_SUFFIX: &str = ".service";

/// Replacement for path separators.
const PLACEHOLDER: char = '-';

/// Replace `/` and `\` with the placeholder.
pub fn sanitize_separators(raw: &str) -> String {
    raw.replace(['/', '\\'], &PLACEHOLDER.to_string())
}

fn reject_empty(raw: &str) -> Result<(), DaemonError> {
    if raw.trim().is_empty() {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::InvalidParameter {
                param: "name".to_string(),
                message: "Service name cannot be empty".to_string(),
            },
        });
    }
    Ok(())
}

/// A sanitized service unit identifier, always ending in `.service`.
///
/// Used by control and delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitName(String);

impl UnitName {
    /// Sanitize a caller-supplied or remotely listed name.
    ///
    /// # Example
    ///
    /// ```
    /// use svcctl_daemon::validation::UnitName;
    ///
    /// assert_eq!(UnitName::sanitize("myapp").unwrap().as_str(), "myapp.service");
    /// assert_eq!(UnitName::sanitize("a/b\\c.service").unwrap().as_str(), "a-b-c.service");
    /// assert!(UnitName::sanitize("").is_err());
    /// ```
    pub fn sanitize(raw: &str) -> Result<Self, DaemonError> {
        reject_empty(raw)?;
        let mut name = sanitize_separators(raw);
        if !name.ends_with(UNIT_SUFFIX) {
            name.push_str(UNIT_SUFFIX);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sanitized unit file name used verbatim, without suffix enforcement.
///
/// Used by unit creation, since timers, sockets and other unit types do not
/// end in `.service`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitFileName(String);

impl UnitFileName {
    pub fn sanitize(raw: &str) -> Result<Self, DaemonError> {
        reject_empty(raw)?;
        let name = sanitize_separators(raw);
        if name == "." || name == ".." {
            return Err(DaemonError::Validation {
                kind: ValidationErrorKind::InvalidParameter {
                    param: "name".to_string(),
                    message: format!("'{}' is not a valid unit file name", name),
                },
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
