//! Core abstractions shared across the finagent workspace
//!
//! This crate defines the top-level error type that tool execution reports
//! through, plus tracing initialization used by the binaries.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::init_tracing;
