//! Per-unit state queries.

use tracing::debug;

use crate::error::DaemonResult;
use crate::executor::{classify_stderr, systemctl, PrivilegedExecutor, ENABLEMENT_BENIGN};
use crate::session::RemoteSession;
use crate::validation::UnitName;

use super::record::{ActiveState, EnabledState};

/// Query `systemctl is-active`.
pub async fn active_state(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    unit: &UnitName,
) -> DaemonResult<ActiveState> {
    let output = executor.run(session, &systemctl::is_active(unit)).await?;
    classify_stderr(&output.stderr, &[])?;
    Ok(output
        .first_line()
        .map(ActiveState::parse)
        .unwrap_or_default())
}

/// Query `systemctl is-enabled`. SysV-backed units print the same
/// redirect notices as enable and disable.
pub async fn enabled_state(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    unit: &UnitName,
) -> DaemonResult<EnabledState> {
    let output = executor.run(session, &systemctl::is_enabled(unit)).await?;
    classify_stderr(&output.stderr, ENABLEMENT_BENIGN)?;
    Ok(output
        .first_line()
        .map(EnabledState::parse)
        .unwrap_or_default())
}

/// Degrade a failed secondary query to `fallback`.
///
/// Session and elevation failures still propagate: they would fail every
/// following command as well.
pub fn or_unknown<T>(result: DaemonResult<T>, fallback: T) -> DaemonResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_session_or_elevation() => Err(e),
        Err(e) => {
            debug!(error = %e, "State query failed, reporting unknown");
            Ok(fallback)
        }
    }
}
