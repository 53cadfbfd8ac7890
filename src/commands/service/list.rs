//! Service listing command.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::commands::traits::Command;
use crate::commands::types::{CommandParams, CommandResult, ExecutionContext};
use crate::engine::ServiceManager;
use crate::error::DaemonError;

/// List every service unit on the managed host.
///
/// Takes no parameters. Returns `{"services": [ServiceRecord, ...]}` in the
/// order the host reported them.
pub struct ListServicesCommand {
    manager: Arc<ServiceManager>,
}

impl ListServicesCommand {
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Command for ListServicesCommand {
    fn name(&self) -> &'static str {
        "service.list"
    }

    fn validate(&self, _params: &CommandParams) -> Result<(), DaemonError> {
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext,
        _params: CommandParams,
    ) -> Result<CommandResult, DaemonError> {
        debug!(request_id = %ctx.request_id, "Listing services");

        let services = self.manager.list_services().await?;

        info!(
            request_id = %ctx.request_id,
            count = services.len(),
            "Services listed"
        );

        Ok(CommandResult::success(serde_json::json!({
            "services": services,
        })))
    }
}
