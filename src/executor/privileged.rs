//! Privileged command execution over a remote session.

use std::fmt;

use tracing::debug;

use crate::error::DaemonResult;
use crate::session::{CommandOutput, RemoteSession};

use super::systemctl::RemoteCommand;

/// Runs commands through `sudo -S`, piping the elevation secret to stdin.
///
/// The executor does not classify output; callers decide what stderr means
/// for their step (see [`super::classify_stderr`]). An `Err` is only ever a
/// session-layer failure.
#[derive(Clone)]
pub struct PrivilegedExecutor {
    secret: String,
}

impl PrivilegedExecutor {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Run `command` with elevation.
    pub async fn run(
        &self,
        session: &mut dyn RemoteSession,
        command: &RemoteCommand,
    ) -> DaemonResult<CommandOutput> {
        debug!(command = %command, "Executing privileged command");
        let elevated = format!("sudo -S {}", command);
        let stdin = format!("{}\n", self.secret);
        session.exec(&elevated, Some(stdin.as_bytes())).await
    }

    /// Run `command` as the login user, with no stdin.
    pub async fn run_unprivileged(
        &self,
        session: &mut dyn RemoteSession,
        command: &RemoteCommand,
    ) -> DaemonResult<CommandOutput> {
        debug!(command = %command, "Executing command");
        session.exec(command.as_str(), None).await
    }
}

impl fmt::Debug for PrivilegedExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivilegedExecutor")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
