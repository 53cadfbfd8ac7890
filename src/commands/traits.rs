//! Command trait definition.

use async_trait::async_trait;

use crate::error::DaemonError;

use super::types::{CommandParams, CommandResult, ExecutionContext};

/// Core trait for all executable commands.
///
/// Every operation the engine exposes to callers implements this trait.
///
/// # Example
///
/// ```ignore
/// pub struct MyCommand;
///
/// #[async_trait]
/// impl Command for MyCommand {
///     fn name(&self) -> &'static str {
///         "my.command"
///     }
///
///     fn validate(&self, params: &CommandParams) -> Result<(), DaemonError> {
///         params.require_string("required_param")?;
///         Ok(())
///     }
///
///     async fn execute(
///         &self,
///         ctx: &ExecutionContext,
///         params: CommandParams,
///     ) -> Result<CommandResult, DaemonError> {
///         let value = params.get_string("required_param")?;
///         Ok(CommandResult::success(serde_json::json!({"value": value})))
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    /// Unique command identifier (e.g., "service.list", "unit.create").
    fn name(&self) -> &'static str;

    /// Validate the command parameters before execution.
    ///
    /// This is called before `execute()` and must not touch the managed
    /// host: a command rejected here never opens a session.
    fn validate(&self, params: &CommandParams) -> Result<(), DaemonError>;

    /// Execute the command against the managed host.
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        params: CommandParams,
    ) -> Result<CommandResult, DaemonError>;
}
