//! Service inventory.
//!
//! Lists the services on the managed host. The structured listing is tried
//! first; any failure there (unparseable output, empty output, a classified
//! stderr) falls back to the tabular listing. Only the fallback's own
//! failure reaches the caller.

mod parser;
pub mod query;
mod record;

use tracing::{debug, info, warn};

use crate::error::{DaemonError, DaemonResult};
use crate::executor::{classify_stderr, systemctl, PrivilegedExecutor, LISTING_BENIGN};
use crate::session::RemoteSession;
use crate::validation::UnitName;

pub use parser::{parse_structured, parse_tabular, ListedUnit, Listing, TabularRow};
pub use record::{ActiveState, EnabledState, ServiceRecord};

/// List services in the order the host reports them.
pub async fn list_services(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
) -> DaemonResult<Vec<ServiceRecord>> {
    probe(session, executor).await?;

    let listing = match fetch_structured(session, executor).await {
        Ok(entries) => Listing::Structured(entries),
        Err(e) => {
            warn!(error = %e, "Structured listing unavailable, falling back to tabular output");
            Listing::Tabular(fetch_tabular(session, executor).await?)
        }
    };

    let units = listing.into_units();
    let mut records = Vec::with_capacity(units.len());
    for unit in units {
        if let Some(record) = resolve(session, executor, unit).await? {
            records.push(record);
        }
    }

    info!(count = records.len(), "Listed services");
    Ok(records)
}

/// Check that the host executes commands at all.
async fn probe(session: &mut dyn RemoteSession, executor: &PrivilegedExecutor) -> DaemonResult<()> {
    let output = executor
        .run_unprivileged(session, &systemctl::whoami())
        .await?;
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return Err(DaemonError::remote(format!(
            "Failed to execute commands on host: {}",
            stderr
        )));
    }
    Ok(())
}

async fn fetch_structured(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
) -> DaemonResult<Vec<serde_json::Value>> {
    let output = executor.run(session, &systemctl::list_units_json()).await?;
    classify_stderr(&output.stderr, LISTING_BENIGN)?;
    parse_structured(&output.stdout)
}

async fn fetch_tabular(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
) -> DaemonResult<Vec<TabularRow>> {
    let output = executor.run(session, &systemctl::list_units_plain()).await?;
    classify_stderr(&output.stderr, LISTING_BENIGN)?;
    Ok(parse_tabular(&output.stdout))
}

/// Complete a listed unit with its queried states.
async fn resolve(
    session: &mut dyn RemoteSession,
    executor: &PrivilegedExecutor,
    unit: ListedUnit,
) -> DaemonResult<Option<ServiceRecord>> {
    let Ok(unit_name) = UnitName::sanitize(&unit.name) else {
        debug!(name = %unit.name, "Skipping unit with unusable name");
        return Ok(None);
    };

    let active_state = match unit.active_state {
        Some(state) => state,
        None => query::or_unknown(
            query::active_state(session, executor, &unit_name).await,
            ActiveState::Unknown,
        )?,
    };
    let enabled_state = query::or_unknown(
        query::enabled_state(session, executor, &unit_name).await,
        EnabledState::Unknown,
    )?;

    Ok(Some(ServiceRecord {
        name: unit.name,
        active_state,
        enabled_state,
        description: unit.description,
        raw_detail: unit.raw_detail,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{ScriptedSession, SUDO_PROMPT};

    const TABLE: &str = "\
ssh.service   loaded active   running OpenBSD Secure Shell server
cron.service  loaded inactive dead    Regular background program processing daemon
";

    fn executor() -> PrivilegedExecutor {
        PrivilegedExecutor::new("raspberry")
    }

    #[tokio::test]
    async fn test_structured_listing() {
        let mut session = ScriptedSession::new()
            .on("whoami", "pi\n", "")
            .on_sudo(
                "--output=json",
                r#"[{"activeState":"active","unit":"x.service"}]"#,
            )
            .on_sudo("is-enabled \"x.service\"", "enabled\n");

        let records = list_services(&mut session, &executor()).await.unwrap();
        assert_eq!(
            records,
            vec![ServiceRecord {
                name: "x.service".to_string(),
                active_state: ActiveState::Active,
                enabled_state: EnabledState::Enabled,
                description: String::new(),
                raw_detail: r#"{"activeState":"active","unit":"x.service"}"#.to_string(),
            }]
        );
        // Active state came from the listing itself.
        assert_eq!(session.count("is-active"), 0);
        assert_eq!(session.count("list-units"), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_invalid_json() {
        let mut session = ScriptedSession::new()
            .on("whoami", "pi\n", "")
            .on_sudo("--output=json", TABLE)
            .on_sudo("list-units", TABLE)
            .on_sudo("is-active \"ssh.service\"", "active\n")
            .on_sudo("is-active \"cron.service\"", "inactive\n")
            .on_sudo("is-enabled \"ssh.service\"", "enabled\n")
            .on_sudo("is-enabled \"cron.service\"", "disabled\n");

        let records = list_services(&mut session, &executor()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "ssh.service");
        assert_eq!(records[0].active_state, ActiveState::Active);
        assert_eq!(records[0].enabled_state, EnabledState::Enabled);
        assert_eq!(records[0].description, "OpenBSD Secure Shell server");
        assert_eq!(records[1].name, "cron.service");
        assert_eq!(records[1].active_state, ActiveState::Inactive);
        assert_eq!(records[1].enabled_state, EnabledState::Disabled);
        assert_eq!(session.count("list-units"), 2);
    }

    #[tokio::test]
    async fn test_fallback_on_stderr_error() {
        let stderr = format!("{}systemctl: unrecognized option '--output=json'\n", SUDO_PROMPT);
        let mut session = ScriptedSession::new()
            .on("whoami", "pi\n", "")
            .on("--output=json", "", &stderr)
            .on_sudo("list-units", "ssh.service loaded active running SSH\n")
            .on_sudo("is-active", "active\n")
            .on_sudo("is-enabled", "enabled\n");

        let records = list_services(&mut session, &executor()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "");
    }

    #[tokio::test]
    async fn test_failed_enabled_query_is_unknown() {
        let stderr = format!(
            "{}Failed to get unit file state for x.service: No such file or directory\n",
            SUDO_PROMPT
        );
        let mut session = ScriptedSession::new()
            .on("whoami", "pi\n", "")
            .on_sudo("--output=json", r#"[{"unit":"x.service","active":"active"}]"#)
            .on("is-enabled", "", &stderr);

        let records = list_services(&mut session, &executor()).await.unwrap();
        assert_eq!(records[0].enabled_state, EnabledState::Unknown);
    }

    #[tokio::test]
    async fn test_sysv_unit_keeps_enabled_state() {
        let stderr = format!(
            "{}alsa-utils.service is not a native service, redirecting to systemd-sysv-install.\nExecuting: /lib/systemd/systemd-sysv-install is-enabled alsa-utils\n",
            SUDO_PROMPT
        );
        let mut session = ScriptedSession::new()
            .on("whoami", "pi\n", "")
            .on_sudo(
                "--output=json",
                r#"[{"unit":"alsa-utils.service","active":"active"}]"#,
            )
            .on("is-enabled", "enabled\n", &stderr);

        let records = list_services(&mut session, &executor()).await.unwrap();
        assert_eq!(records[0].enabled_state, EnabledState::Enabled);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_surfaced() {
        let stderr = format!("{}Sorry, try again.\n", SUDO_PROMPT);
        let mut session = ScriptedSession::new()
            .on("whoami", "pi\n", "")
            .on("list-units", "", &stderr);

        let err = list_services(&mut session, &executor()).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_ELEVATION_CREDENTIAL");
        assert_eq!(session.count("list-units"), 2);
    }

    #[tokio::test]
    async fn test_probe_failure() {
        let mut session = ScriptedSession::new().on("whoami", "", "sh: whoami: not permitted\n");

        let err = list_services(&mut session, &executor()).await.unwrap_err();
        assert_eq!(err.code(), "REMOTE_COMMAND_ERROR");
        assert_eq!(session.count("list-units"), 0);
    }
}
