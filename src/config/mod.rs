//! Configuration module for the service control daemon.
//!
//! Handles loading configuration from TOML files and the environment.

mod settings;

pub use settings::*;
