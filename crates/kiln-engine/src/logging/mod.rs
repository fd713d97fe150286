//! Logging utilities.
//!
//! The engine itself only talks to the `log` facade. This module installs the
//! `env_logger` backend for binaries and tests that want to see it.

mod init;

pub use init::{init_logging, LoggingConfig};
