//! Unit file commands.
//!
//! - `unit.create` - Install a unit file and reload systemd
//! - `unit.delete` - Stop, disable and remove a service unit

mod create;
mod delete;

pub use create::CreateUnitCommand;
pub use delete::DeleteUnitCommand;
