//! Input validation module.
//!
//! Sanitizes the unit identifiers that are placed into remote commands.

mod unit_name;

pub use unit_name::{sanitize_separators, UnitFileName, UnitName, UNIT_SUFFIX};
