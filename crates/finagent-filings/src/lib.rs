//! SEC filing analysis and market data toolset
//!
//! This crate implements the financial side of the agent: resolving user
//! questions to 10-K items, summarizing filing sections with a language
//! model, reshaping XBRL financial statements, comparing peer companies,
//! and fetching quotes, earnings, and analyst ratings. It includes:
//!
//! - A closed catalog of 10-K item codes with titles, descriptions, and
//!   extraction hints (`catalog`)
//! - Item inference and validation against the catalog (`resolver`)
//! - Per-section summarization and structured extraction (`summarizer`)
//! - End-to-end 10-K summary assembly (`assembler`)
//! - SEC EDGAR, Finnhub, and Yahoo search clients (`api`)
//! - Wide-to-long statement reshaping from XBRL facts (`statements`,
//!   `reshape`)
//! - Peer data gathering and comparison narratives (`peers`)
//! - Tool wrappers exposing all of the above to an agent (`tools`)
//!
//! # Architecture
//!
//! Services are stateless objects holding their collaborators behind
//! trait objects (`FilingProvider`, `MarketDataProvider`, `LlmClient`,
//! `PeerDataSource`), so every pipeline is testable with doubles. All
//! structured model output is decoded into typed contracts before use;
//! an out-of-catalog item code fails at decode time, never downstream.
//!
//! # Example
//!
//! ```rust,ignore
//! use finagent_filings::api::SecEdgarClient;
//! use finagent_filings::assembler::FilingSummaryService;
//! use finagent_filings::catalog::ItemCatalog;
//! use finagent_llm::providers::OpenAiClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let llm = Arc::new(OpenAiClient::from_env()?);
//!     let edgar = Arc::new(SecEdgarClient::from_env());
//!     let catalog = Arc::new(ItemCatalog::ten_k());
//!
//!     let service = FilingSummaryService::new(llm, edgar, catalog);
//!     let report = service
//!         .latest_tenk_item_summary("What are the main risks?", "MU", None)
//!         .await?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filing;
pub mod memory;
pub mod peers;
pub mod reshape;
pub mod resolver;
pub mod schemas;
pub mod statements;
pub mod summarizer;
pub mod tools;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use assembler::FilingSummaryService;
pub use catalog::{ItemCatalog, ItemCode, ItemMetadata};
pub use config::FilingsConfig;
pub use error::{FilingsError, Result};
pub use filing::{FilingDocument, FilingProvider, FormType};
pub use memory::MemoryStore;
pub use peers::{PeerComparisonService, PeerDataAggregator};
pub use schemas::{ClientMemory, FilingItemSummary, FilingSummary, PeerInfo};
pub use statements::{StatementService, StatementSource, StatementType};
pub use tools::register_tools;
