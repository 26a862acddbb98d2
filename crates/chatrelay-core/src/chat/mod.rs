//! Chat orchestration: one user message in, one assistant reply out.

pub mod orchestrator;
pub mod window;
