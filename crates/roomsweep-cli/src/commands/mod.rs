//! CLI command implementations.

pub mod analyze;
pub mod calibration;
pub mod common;
pub mod generate;
pub mod profile;
