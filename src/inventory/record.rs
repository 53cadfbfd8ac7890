//! Normalized service records.

use std::fmt;

use serde::Serialize;

/// Runtime state of a unit as reported by systemd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveState {
    Active,
    Inactive,
    Failed,
    Activating,
    Deactivating,
    #[default]
    Unknown,
}

impl ActiveState {
    /// Parse systemd output leniently; anything unrecognized is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => ActiveState::Active,
            "inactive" => ActiveState::Inactive,
            "failed" => ActiveState::Failed,
            "activating" => ActiveState::Activating,
            "deactivating" => ActiveState::Deactivating,
            _ => ActiveState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveState::Active => "active",
            ActiveState::Inactive => "inactive",
            ActiveState::Failed => "failed",
            ActiveState::Activating => "activating",
            ActiveState::Deactivating => "deactivating",
            ActiveState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boot-time enablement of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnabledState {
    Enabled,
    Disabled,
    Static,
    Masked,
    #[default]
    Unknown,
}

impl EnabledState {
    /// Parse `systemctl is-enabled` output. Runtime variants fold into
    /// their persistent counterpart; anything else is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "enabled" | "enabled-runtime" => EnabledState::Enabled,
            "disabled" => EnabledState::Disabled,
            "static" => EnabledState::Static,
            "masked" | "masked-runtime" => EnabledState::Masked,
            _ => EnabledState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnabledState::Enabled => "enabled",
            EnabledState::Disabled => "disabled",
            EnabledState::Static => "static",
            EnabledState::Masked => "masked",
            EnabledState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EnabledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One service on the managed host. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    pub name: String,
    pub active_state: ActiveState,
    pub enabled_state: EnabledState,
    pub description: String,
    /// Source text of the entry, for diagnostics.
    pub raw_detail: String,
}
