//! Service control command.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::commands::traits::Command;
use crate::commands::types::{CommandParams, CommandResult, ExecutionContext};
use crate::control::ServiceAction;
use crate::engine::ServiceManager;
use crate::error::{DaemonError, ValidationErrorKind};

/// Apply an action to a service and report its resulting state.
///
/// # Parameters
///
/// - `name` (required): Service name, with or without the `.service` suffix
/// - `action` (required): One of `start`, `stop`, `restart`, `status`,
///   `enable`, `disable`
pub struct ControlServiceCommand {
    manager: Arc<ServiceManager>,
}

impl ControlServiceCommand {
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Command for ControlServiceCommand {
    fn name(&self) -> &'static str {
        "service.control"
    }

    fn validate(&self, params: &CommandParams) -> Result<(), DaemonError> {
        let name = params.get_string("name")?;
        if name.trim().is_empty() {
            return Err(DaemonError::Validation {
                kind: ValidationErrorKind::InvalidParameter {
                    param: "name".to_string(),
                    message: "Service name cannot be empty".to_string(),
                },
            });
        }
        params.get_string("action")?.parse::<ServiceAction>()?;
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext,
        params: CommandParams,
    ) -> Result<CommandResult, DaemonError> {
        let name = params.get_string("name")?;
        let action = params.get_string("action")?;

        debug!(
            request_id = %ctx.request_id,
            service = %name,
            action = %action,
            "Controlling service"
        );

        let outcome = self.manager.control_service(&name, &action).await?;

        info!(
            request_id = %ctx.request_id,
            unit = %outcome.unit,
            action = %outcome.action,
            state = %outcome.state,
            "Service control completed"
        );

        Ok(CommandResult::success(serde_json::to_value(&outcome)?))
    }
}
