//! CLI-specific utilities for butterfly-ecoroute
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod report;

pub use report::{describe_error, exit_code, render_path};
