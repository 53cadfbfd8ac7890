//! Remote session module.
//!
//! A session is one authenticated execution channel to the managed host.
//! It is opened for a single request, used for a strictly sequential run of
//! commands, and closed on every exit path.

mod credentials;
mod ssh;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::error::DaemonResult;

pub use credentials::SessionCredentials;
pub use ssh::SshSessionProvider;

/// Raw result of one remote command.
///
/// Outcomes are classified from `stderr` content and `stdout` parseability;
/// the exit status is kept for diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    /// First non-empty line of stdout, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout.lines().map(str::trim).find(|l| !l.is_empty())
    }
}

/// Opens sessions to the managed host.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a new, exclusively owned session.
    async fn open(&self) -> DaemonResult<Box<dyn RemoteSession>>;
}

/// An open execution channel.
#[async_trait]
pub trait RemoteSession: Send {
    /// Run `command` through the remote shell, writing `stdin` to its
    /// standard input, and read both output streams to the end.
    ///
    /// Errors here are session-layer failures only; a command that fails on
    /// the host still returns `Ok` with its stderr populated.
    async fn exec(&mut self, command: &str, stdin: Option<&[u8]>) -> DaemonResult<CommandOutput>;

    /// Release the session.
    async fn close(&mut self) -> DaemonResult<()>;
}
