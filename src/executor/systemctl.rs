//! Remote command construction.
//!
//! One function per logical command. Unit identifiers are accepted only as
//! sanitized [`UnitName`] / [`UnitFileName`] values, and a [`RemoteCommand`]
//! can only be built here.

use std::fmt;

use base64::Engine;

use crate::validation::{UnitFileName, UnitName};

/// Directory holding administrator-created unit files.
pub const UNIT_DIR: &str = "/etc/systemd/system";

/// Permissions applied to created unit files.
const UNIT_FILE_MODE: &str = "644";

/// Column count of the `list-units` prefix (UNIT LOAD ACTIVE SUB).
pub const TABULAR_PREFIX_COLUMNS: usize = 4;

const LIST_UNITS: &str = "systemctl list-units --type=service --all --no-pager --no-legend";

/// A shell command string ready to run on the managed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand(String);

impl RemoteCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn unit_verb(verb: &str, unit: &UnitName) -> RemoteCommand {
    RemoteCommand(format!("systemctl {} \"{}\"", verb, unit))
}

fn unit_file_path(name: &str) -> String {
    format!("{}/{}", UNIT_DIR, name)
}

/// Connectivity probe, run without elevation.
pub fn whoami() -> RemoteCommand {
    RemoteCommand("whoami".to_string())
}

/// Structured (JSON) unit listing.
pub fn list_units_json() -> RemoteCommand {
    RemoteCommand(format!("{} --output=json", LIST_UNITS))
}

/// Plain tabular unit listing.
pub fn list_units_plain() -> RemoteCommand {
    RemoteCommand(LIST_UNITS.to_string())
}

pub fn is_active(unit: &UnitName) -> RemoteCommand {
    unit_verb("is-active", unit)
}

pub fn is_enabled(unit: &UnitName) -> RemoteCommand {
    unit_verb("is-enabled", unit)
}

pub fn start(unit: &UnitName) -> RemoteCommand {
    unit_verb("start", unit)
}

pub fn stop(unit: &UnitName) -> RemoteCommand {
    unit_verb("stop", unit)
}

pub fn restart(unit: &UnitName) -> RemoteCommand {
    unit_verb("restart", unit)
}

pub fn enable(unit: &UnitName) -> RemoteCommand {
    unit_verb("enable", unit)
}

pub fn disable(unit: &UnitName) -> RemoteCommand {
    unit_verb("disable", unit)
}

/// Write `content` verbatim to the unit file.
///
/// The content travels base64-encoded and is decoded by the remote shell,
/// so it never needs quoting.
pub fn write_unit_file(name: &UnitFileName, content: &str) -> RemoteCommand {
    let encoded = base64::engine::general_purpose::STANDARD.encode(content);
    RemoteCommand(format!(
        "sh -c 'echo {} | base64 -d > \"{}\"'",
        encoded,
        unit_file_path(name.as_str())
    ))
}

pub fn chmod_unit_file(name: &UnitFileName) -> RemoteCommand {
    RemoteCommand(format!(
        "chmod {} \"{}\"",
        UNIT_FILE_MODE,
        unit_file_path(name.as_str())
    ))
}

pub fn remove_unit_file(unit: &UnitName) -> RemoteCommand {
    RemoteCommand(format!("rm -f \"{}\"", unit_file_path(unit.as_str())))
}

pub fn daemon_reload() -> RemoteCommand {
    RemoteCommand("systemctl daemon-reload".to_string())
}

pub fn reset_failed() -> RemoteCommand {
    RemoteCommand("systemctl reset-failed".to_string())
}
