//! Tool management and execution framework for finagent
//!
//! This crate provides the callable-tool seam between the filing pipeline
//! and an outer conversational agent: a `Tool` trait for the individual
//! entry points and a `ToolRegistry` that aggregates them into a
//! discoverable catalog.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
