//! Service control state machine.
//!
//! Maps a requested action on a unit to its remote subcommand, then reports
//! the state systemd gives back afterwards. Nothing is tracked locally.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DaemonError, DaemonResult, ValidationErrorKind};
use crate::executor::{
    classify_stderr, systemctl, PrivilegedExecutor, RemoteCommand, ENABLEMENT_BENIGN,
};
use crate::inventory::query;
use crate::inventory::{ActiveState, EnabledState};
use crate::session::RemoteSession;
use crate::validation::UnitName;

/// Actions a caller may request on a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
    Status,
    Enable,
    Disable,
}

impl ServiceAction {
    pub const ALL: [ServiceAction; 6] = [
        ServiceAction::Start,
        ServiceAction::Stop,
        ServiceAction::Restart,
        ServiceAction::Status,
        ServiceAction::Enable,
        ServiceAction::Disable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
            ServiceAction::Status => "status",
            ServiceAction::Enable => "enable",
            ServiceAction::Disable => "disable",
        }
    }

    /// The mutating subcommand, if any. `status` has none.
    fn subcommand(&self, unit: &UnitName) -> Option<RemoteCommand> {
        match self {
            ServiceAction::Start => Some(systemctl::start(unit)),
            ServiceAction::Stop => Some(systemctl::stop(unit)),
            ServiceAction::Restart => Some(systemctl::restart(unit)),
            ServiceAction::Enable => Some(systemctl::enable(unit)),
            ServiceAction::Disable => Some(systemctl::disable(unit)),
            ServiceAction::Status => None,
        }
    }

    /// Whether the confirmation query reads the enabled state.
    fn reports_enablement(&self) -> bool {
        matches!(self, ServiceAction::Enable | ServiceAction::Disable)
    }

    /// Stderr lines of the subcommand that are notices, not failures.
    fn benign(&self) -> &'static [&'static str] {
        if self.reports_enablement() {
            ENABLEMENT_BENIGN
        } else {
            &[]
        }
    }
}

impl FromStr for ServiceAction {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DaemonError::Validation {
                kind: ValidationErrorKind::InvalidAction {
                    action: s.to_string(),
                },
            })
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State reported after an action. Serializes as the bare state string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportedState {
    Active(ActiveState),
    Enabled(EnabledState),
}

impl ReportedState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportedState::Active(state) => state.as_str(),
            ReportedState::Enabled(state) => state.as_str(),
        }
    }
}

impl fmt::Display for ReportedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a control action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOutcome {
    pub unit: String,
    pub action: ServiceAction,
    pub state: ReportedState,
    pub message: String,
}

/// Apply `action` to `unit` and report the resulting state.
pub async fn apply(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    unit: &UnitName,
    action: ServiceAction,
) -> DaemonResult<ControlOutcome> {
    if let Some(command) = action.subcommand(unit) {
        debug!(unit = %unit, action = %action, "Issuing control subcommand");
        let output = executor.run(session, &command).await?;
        classify_stderr(&output.stderr, action.benign())?;
    }

    let state = if action.reports_enablement() {
        ReportedState::Enabled(query::enabled_state(session, executor, unit).await?)
    } else {
        ReportedState::Active(query::active_state(session, executor, unit).await?)
    };

    info!(unit = %unit, action = %action, state = %state, "Service control completed");

    Ok(ControlOutcome {
        unit: unit.to_string(),
        action,
        state,
        message: format!("Service {} {} completed successfully", unit, action),
    })
}
