//! Language-model collaborator abstraction for finagent
//!
//! This crate provides the seam between the filing pipeline and whatever
//! model service backs it:
//!
//! - `LlmClient` trait with a free-text completion and a schema-constrained
//!   JSON completion
//! - `complete_structured` decode-and-validate helper that turns a JSON
//!   completion into a typed value, never assuming the model honored the
//!   requested schema
//! - An OpenAI-compatible provider implementation

pub mod client;
pub mod error;
pub mod providers;

pub use client::{LlmClient, complete_structured};
pub use error::{LlmError, Result};
pub use providers::{OpenAiClient, OpenAiConfig};
