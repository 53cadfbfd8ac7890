//! Service commands.
//!
//! - `service.list` - List services with their states
//! - `service.control` - Start, stop, restart, enable, disable or query a service

mod control;
mod list;

pub use control::ControlServiceCommand;
pub use list::ListServicesCommand;
