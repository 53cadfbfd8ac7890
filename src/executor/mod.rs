//! Privileged command executor module.
//!
//! Builds remote commands, runs them with sudo elevation and classifies
//! what they wrote to stderr.

mod elevation;
mod privileged;
pub mod systemctl;

pub use elevation::{
    classify_stderr, strip_elevation_prompt, ABSENT_FILE_BENIGN, ENABLEMENT_BENIGN, LISTING_BENIGN,
};
pub use privileged::PrivilegedExecutor;
pub use systemctl::RemoteCommand;
