//! Error types for the service control daemon.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
