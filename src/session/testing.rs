//! Scripted session for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DaemonResult;

use super::{CommandOutput, RemoteSession, SessionProvider};

/// Prompt sudo writes to stderr when reading the password from stdin.
pub(crate) const SUDO_PROMPT: &str = "[sudo] password for pi: ";

/// Answers commands from a list of substring rules; first match wins.
/// Unmatched commands produce empty output. Clones share the close counter.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedSession {
    rules: Vec<(String, CommandOutput)>,
    pub commands: Vec<String>,
    pub stdins: Vec<Option<Vec<u8>>>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern`.
    pub fn on(mut self, pattern: &str, stdout: &str, stderr: &str) -> Self {
        self.rules.push((
            pattern.to_string(),
            CommandOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_status: Some(0),
            },
        ));
        self
    }

    /// Answer with the sudo prompt as the only stderr content.
    pub fn on_sudo(self, pattern: &str, stdout: &str) -> Self {
        self.on(pattern, stdout, SUDO_PROMPT)
    }

    /// Number of times this session or any of its clones was closed.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Number of executed commands containing `pattern`.
    pub fn count(&self, pattern: &str) -> usize {
        self.commands.iter().filter(|c| c.contains(pattern)).count()
    }
}

#[async_trait]
impl RemoteSession for ScriptedSession {
    async fn exec(&mut self, command: &str, stdin: Option<&[u8]>) -> DaemonResult<CommandOutput> {
        self.commands.push(command.to_string());
        self.stdins.push(stdin.map(<[u8]>::to_vec));
        Ok(self
            .rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }

    async fn close(&mut self) -> DaemonResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out a fresh copy of a scripted session on every open.
pub(crate) struct ScriptedProvider {
    script: ScriptedSession,
    opened: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: ScriptedSession) -> Self {
        Self {
            script,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.script.closes()
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn open(&self) -> DaemonResult<Box<dyn RemoteSession>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.script.clone()))
    }
}
