//! Command line interface module
//!
//! This module provides argument parsing, operation mode selection and the
//! runner that drives the list-equivalents and add-tag workflows.

pub mod args;
pub mod operation_mode;
pub mod runner;

pub use args::Args;
pub use operation_mode::OperationMode;
pub use runner::Runner;
