//! Inference boundary.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for runtime provider selection

pub mod box_provider;
pub mod provider;
