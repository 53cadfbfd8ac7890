//! Delete unit command.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::commands::traits::Command;
use crate::commands::types::{CommandParams, CommandResult, ExecutionContext};
use crate::engine::ServiceManager;
use crate::error::DaemonError;
use crate::validation::UnitName;

/// Stop, disable and remove a service unit. Succeeds when the unit does not
/// exist.
///
/// # Parameters
///
/// - `name` (required): Service name, with or without the `.service` suffix
pub struct DeleteUnitCommand {
    manager: Arc<ServiceManager>,
}

impl DeleteUnitCommand {
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Command for DeleteUnitCommand {
    fn name(&self) -> &'static str {
        "unit.delete"
    }

    fn validate(&self, params: &CommandParams) -> Result<(), DaemonError> {
        UnitName::sanitize(&params.get_string("name")?)?;
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext,
        params: CommandParams,
    ) -> Result<CommandResult, DaemonError> {
        let name = params.get_string("name")?;

        debug!(request_id = %ctx.request_id, service = %name, "Deleting unit");

        let outcome = self.manager.delete_unit(&name).await?;

        info!(
            request_id = %ctx.request_id,
            unit = %outcome.unit,
            "Unit deleted"
        );

        Ok(CommandResult::success(serde_json::to_value(&outcome)?))
    }
}
