//! Infrastructure layer for chatrelay.
//!
//! Concrete implementations of the ports defined in `chatrelay-core`:
//! SQLite-backed conversation storage and OpenAI-compatible inference
//! providers, plus the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
