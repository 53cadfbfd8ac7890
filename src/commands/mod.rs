//! Command handlers module.
//!
//! Contains the command registry and all command implementations. Commands
//! are the request-level surface over [`crate::engine::ServiceManager`].
//!
//! ## Adding a New Command
//!
//! 1. Create a new file in the appropriate subdirectory (e.g., `service/`, `unit/`)
//! 2. Implement the `Command` trait
//! 3. Register the command in `CommandRegistry::new()`

mod registry;
mod traits;
mod types;

pub mod service;
pub mod unit;

pub use registry::CommandRegistry;
pub use traits::Command;
pub use types::{CommandParams, CommandResult, ExecutionContext};
