//! SSH session provider built on russh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, AuthResult, Handler};
use russh::{ChannelMsg, Disconnect};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{DaemonError, DaemonResult, SessionErrorKind};

use super::{CommandOutput, RemoteSession, SessionCredentials, SessionProvider};

/// SSH extended data stream number for stderr.
const STDERR_STREAM: u32 = 1;

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// russh client handler. The managed host's key is accepted unconditionally.
pub struct Client;

impl Handler for Client {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Opens one password-authenticated SSH session per call.
pub struct SshSessionProvider {
    credentials: SessionCredentials,
    config: Arc<client::Config>,
    command_timeout: Duration,
}

impl SshSessionProvider {
    /// Create a provider. Fails if host or username is empty.
    pub fn new(credentials: SessionCredentials) -> Result<Self, DaemonError> {
        credentials.validate()?;
        Ok(Self {
            credentials,
            config: Arc::new(client::Config::default()),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        })
    }

    /// Bound every remote command by `command_timeout`.
    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    fn connection_failed(&self, message: impl Into<String>) -> DaemonError {
        DaemonError::Session {
            kind: SessionErrorKind::ConnectionFailed {
                host: self.credentials.host.clone(),
                message: message.into(),
            },
        }
    }
}

#[async_trait]
impl SessionProvider for SshSessionProvider {
    async fn open(&self) -> DaemonResult<Box<dyn RemoteSession>> {
        let creds = &self.credentials;
        let address = creds.address();
        info!(host = %address, user = %creds.username, "Connecting to managed host");

        let connect = client::connect(
            Arc::clone(&self.config),
            (creds.host.as_str(), creds.port),
            Client,
        );
        let mut handle = match timeout(creds.connect_timeout, connect).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(russh::Error::IO(e))) => {
                warn!(host = %address, error = %e, "Connection failed");
                return Err(self.connection_failed(e.to_string()));
            }
            Ok(Err(e)) => {
                warn!(host = %address, error = %e, "SSH handshake failed");
                return Err(DaemonError::Session {
                    kind: SessionErrorKind::TransportError {
                        message: e.to_string(),
                    },
                });
            }
            Err(_) => {
                warn!(host = %address, "Connection timed out");
                return Err(self.connection_failed(format!(
                    "connection timed out after {}s",
                    creds.connect_timeout.as_secs()
                )));
            }
        };

        let auth = handle.authenticate_password(creds.username.clone(), creds.secret.clone());
        match timeout(creds.connect_timeout, auth).await {
            Ok(Ok(AuthResult::Success)) => {
                debug!(host = %address, user = %creds.username, "Authenticated");
            }
            Ok(Ok(AuthResult::Failure { .. })) => {
                warn!(host = %address, user = %creds.username, "Authentication rejected");
                return Err(DaemonError::Session {
                    kind: SessionErrorKind::AuthenticationFailed {
                        host: creds.host.clone(),
                        username: creds.username.clone(),
                    },
                });
            }
            Ok(Err(e)) => {
                warn!(host = %address, error = %e, "Authentication error");
                return Err(DaemonError::Session {
                    kind: SessionErrorKind::TransportError {
                        message: e.to_string(),
                    },
                });
            }
            Err(_) => {
                warn!(host = %address, "Authentication timed out");
                return Err(self.connection_failed(format!(
                    "authentication timed out after {}s",
                    creds.connect_timeout.as_secs()
                )));
            }
        }

        Ok(Box::new(SshSession {
            handle,
            command_timeout: self.command_timeout,
        }))
    }
}

/// An authenticated SSH connection. Each command runs on its own channel.
pub struct SshSession {
    handle: client::Handle<Client>,
    command_timeout: Duration,
}

impl SshSession {
    async fn run(&self, command: &str, stdin: Option<&[u8]>) -> Result<CommandOutput, russh::Error> {
        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;
        if let Some(input) = stdin {
            channel.data(input).await?;
        }
        channel.eof().await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } if ext == STDERR_STREAM => {
                    stderr.extend_from_slice(data)
                }
                // More data may still follow the exit status.
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_status,
        })
    }
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn exec(&mut self, command: &str, stdin: Option<&[u8]>) -> DaemonResult<CommandOutput> {
        match timeout(self.command_timeout, self.run(command, stdin)).await {
            Ok(Ok(output)) => {
                debug!(
                    exit_status = ?output.exit_status,
                    stdout_bytes = output.stdout.len(),
                    stderr_bytes = output.stderr.len(),
                    "Remote command completed"
                );
                Ok(output)
            }
            Ok(Err(e)) => Err(DaemonError::Session {
                kind: SessionErrorKind::TransportError {
                    message: format!("Command execution failed: {}", e),
                },
            }),
            Err(_) => Err(DaemonError::Session {
                kind: SessionErrorKind::TransportError {
                    message: format!(
                        "Command timed out after {}s",
                        self.command_timeout.as_secs()
                    ),
                },
            }),
        }
    }

    async fn close(&mut self) -> DaemonResult<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(|e| DaemonError::Session {
                kind: SessionErrorKind::TransportError {
                    message: format!("Failed to close connection: {}", e),
                },
            })
    }
}
