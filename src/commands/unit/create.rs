//! Create unit command.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::commands::traits::Command;
use crate::commands::types::{CommandParams, CommandResult, ExecutionContext};
use crate::engine::ServiceManager;
use crate::error::DaemonError;
use crate::lifecycle::UnitDefinition;
use crate::validation::UnitFileName;

/// Write a unit file to the managed host's unit directory.
///
/// # Parameters
///
/// - `name` (required): File name, used as given (e.g. `foo.service`,
///   `backup.timer`)
/// - `content` (required): Unit file content, written verbatim
/// - `description` (optional): Free text recorded in the logs
pub struct CreateUnitCommand {
    manager: Arc<ServiceManager>,
}

impl CreateUnitCommand {
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Command for CreateUnitCommand {
    fn name(&self) -> &'static str {
        "unit.create"
    }

    fn validate(&self, params: &CommandParams) -> Result<(), DaemonError> {
        UnitFileName::sanitize(&params.get_string("name")?)?;
        params.require_string("content")?;
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext,
        params: CommandParams,
    ) -> Result<CommandResult, DaemonError> {
        let definition = UnitDefinition {
            name: params.get_string("name")?,
            content: params.get_string("content")?,
            description: params.get_optional_string("description"),
        };

        debug!(
            request_id = %ctx.request_id,
            unit = %definition.name,
            content_len = definition.content.len(),
            "Creating unit"
        );

        let outcome = self.manager.create_unit(&definition).await?;

        info!(
            request_id = %ctx.request_id,
            unit = %outcome.unit,
            "Unit created"
        );

        Ok(CommandResult::success(serde_json::to_value(&outcome)?))
    }
}
