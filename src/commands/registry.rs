//! Command registry for dispatching requests to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::ServiceManager;
use crate::error::{CommandErrorKind, DaemonError};

use super::service::{ControlServiceCommand, ListServicesCommand};
use super::traits::Command;
use super::types::{CommandParams, CommandResult, ExecutionContext};
use super::unit::{CreateUnitCommand, DeleteUnitCommand};

/// Registry of all available commands.
#[derive(Clone)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with every command bound to `manager`.
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };

        // Service commands
        registry.register(Arc::new(ListServicesCommand::new(Arc::clone(&manager))));
        registry.register(Arc::new(ControlServiceCommand::new(Arc::clone(&manager))));

        // Unit file commands
        registry.register(Arc::new(CreateUnitCommand::new(Arc::clone(&manager))));
        registry.register(Arc::new(DeleteUnitCommand::new(manager)));

        info!(
            count = registry.commands.len(),
            "Command registry initialized"
        );

        registry
    }

    /// Register a command.
    fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name();
        debug!(command = name, "Registering command");
        self.commands.insert(name, command);
    }

    /// Dispatch a request to the appropriate command handler.
    ///
    /// Parameters are validated before the handler runs, so a rejected
    /// request never reaches the managed host.
    pub async fn dispatch(
        &self,
        ctx: &ExecutionContext,
        command_name: &str,
        params: CommandParams,
    ) -> Result<CommandResult, DaemonError> {
        // Look up the command
        let command = self
            .commands
            .get(command_name)
            .ok_or_else(|| DaemonError::Command {
                kind: CommandErrorKind::UnknownCommand {
                    name: command_name.to_string(),
                },
            })?;

        // Validate parameters
        command.validate(&params)?;

        // Execute the command
        command.execute(ctx, params).await
    }

    /// Dispatch and fold any error into a failure result.
    pub async fn handle(
        &self,
        ctx: &ExecutionContext,
        command_name: &str,
        params: CommandParams,
    ) -> CommandResult {
        let result = match self.dispatch(ctx, command_name, params).await {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    request_id = %ctx.request_id,
                    received_at = %ctx.timestamp.to_rfc3339(),
                    command = command_name,
                    code = e.code(),
                    error = %e,
                    "Command failed"
                );
                CommandResult::from_error(&e)
            }
        };
        info!(
            request_id = %ctx.request_id,
            command = command_name,
            success = result.success,
            elapsed_ms = ctx.elapsed().num_milliseconds(),
            "Command finished"
        );
        result
    }

    /// List all registered command names.
    pub fn list_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{ScriptedProvider, ScriptedSession};

    fn registry(script: ScriptedSession) -> (CommandRegistry, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(script));
        let manager = Arc::new(ServiceManager::new(provider.clone(), "pw"));
        (CommandRegistry::new(manager), provider)
    }

    #[test]
    fn test_registry_has_commands() {
        let (registry, _) = registry(ScriptedSession::new());
        assert_eq!(
            registry.list_commands(),
            vec!["service.control", "service.list", "unit.create", "unit.delete"]
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let (registry, _) = registry(ScriptedSession::new());
        let ctx = ExecutionContext::for_command("unknown.command");
        let params = CommandParams::new(serde_json::json!({}));

        let result = registry.dispatch(&ctx, "unknown.command", params).await;
        assert!(matches!(
            result,
            Err(DaemonError::Command {
                kind: CommandErrorKind::UnknownCommand { .. }
            })
        ));
    }

    #[tokio::test]
    async fn test_validation_failure_opens_no_session() {
        let (registry, provider) = registry(ScriptedSession::new());
        let ctx = ExecutionContext::for_command("service.control");
        let params = CommandParams::new(serde_json::json!({
            "name": "bad name",
            "action": "explode"
        }));

        let result = registry.handle(&ctx, "service.control", params).await;
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("INVALID_ACTION"));
        assert_eq!(provider.opened(), 0);
    }

    #[tokio::test]
    async fn test_handle_reports_remote_failure() {
        let (registry, provider) = registry(ScriptedSession::new().on(
            "systemctl",
            "",
            "[sudo] password for pi: Sorry, try again.\n",
        ));
        let ctx = ExecutionContext::for_command("service.control");
        let params = CommandParams::new(serde_json::json!({"name": "x", "action": "stop"}));
        let result = registry.handle(&ctx, "service.control", params).await;
        assert!(!result.success);
        assert_eq!(
            result.error_code.as_deref(),
            Some("INVALID_ELEVATION_CREDENTIAL")
        );
        assert_eq!(provider.opened(), 1);
        assert_eq!(provider.closed(), 1);
    }
}
