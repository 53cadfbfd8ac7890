//! Unit file lifecycle.
//!
//! Create and delete are ordered step sequences. Each step is either fatal
//! (its classified stderr aborts the operation) or best-effort (failures are
//! logged and the sequence continues).

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::DaemonResult;
use crate::executor::{
    classify_stderr, systemctl, PrivilegedExecutor, RemoteCommand, ABSENT_FILE_BENIGN,
};
use crate::session::RemoteSession;
use crate::validation::{UnitFileName, UnitName};

/// A unit file to install on the managed host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// File name under the unit directory, used as given.
    pub name: String,
    /// File content, written verbatim.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Confirmation of a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleOutcome {
    pub unit: String,
    pub message: String,
}

/// Install a unit file and reload the unit cache.
pub async fn create_unit(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    definition: &UnitDefinition,
) -> DaemonResult<LifecycleOutcome> {
    let file = UnitFileName::sanitize(&definition.name)?;
    debug!(
        unit = %file,
        bytes = definition.content.len(),
        description = definition.description.as_deref().unwrap_or(""),
        "Writing unit file"
    );

    let output = executor
        .run(session, &systemctl::write_unit_file(&file, &definition.content))
        .await?;
    classify_stderr(&output.stderr, &[])?;

    best_effort(session, executor, &systemctl::chmod_unit_file(&file)).await;
    best_effort(session, executor, &systemctl::daemon_reload()).await;

    info!(unit = %file, "Unit file created");
    Ok(LifecycleOutcome {
        unit: file.to_string(),
        message: "Service created successfully".to_string(),
    })
}

/// Stop, disable and remove a unit. Removing a unit that does not exist
/// succeeds.
pub async fn delete_unit(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    name: &str,
) -> DaemonResult<LifecycleOutcome> {
    let unit = UnitName::sanitize(name)?;

    best_effort(session, executor, &systemctl::stop(&unit)).await;
    best_effort(session, executor, &systemctl::disable(&unit)).await;

    let output = executor
        .run(session, &systemctl::remove_unit_file(&unit))
        .await?;
    classify_stderr(&output.stderr, ABSENT_FILE_BENIGN)?;

    best_effort(session, executor, &systemctl::daemon_reload()).await;
    best_effort(session, executor, &systemctl::reset_failed()).await;

    info!(unit = %unit, "Unit removed");
    Ok(LifecycleOutcome {
        unit: unit.to_string(),
        message: format!("Service {} removed", name),
    })
}

/// Run a step whose failure does not affect the outcome.
async fn best_effort(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    command: &RemoteCommand,
) {
    let result = match executor.run(session, command).await {
        Ok(output) => classify_stderr(&output.stderr, &[]),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!(command = %command, error = %e, "Best-effort step failed");
    }
}
