//! svcctl Daemon Library
//!
//! Remote control of systemd services over SSH: listing, start/stop/restart,
//! enable/disable, and creation and removal of unit files on a single
//! managed host.

pub mod commands;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod lifecycle;
pub mod session;
pub mod validation;
