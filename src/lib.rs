//! ESG Agent Orchestrator
//!
//! Multi-agent ESG analysis pipeline:
//! - Acquires market price, recent closes and news sentiment with bounded fallbacks
//! - Scores ESG, risk, trading, compliance, regulation, volatility and scenarios
//! - Aggregates agent votes into a confidence-weighted consensus
//! - Records every analysis in a content-addressed audit ledger
//!
//! PIPELINE:
//! ACQUIRE → ESG → FAN-OUT AGENTS → CONSENSUS → AUDIT

pub mod acquisition;
pub mod agents;
pub mod api;
pub mod audit;
pub mod config;
pub mod consensus;
pub mod error;
pub mod models;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use orchestrator::Orchestrator;
