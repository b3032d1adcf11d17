//! Conversation orchestration for Chorus.
//!
//! Drives one state machine per conversation context: requirements gathering
//! through the creator persona, staged synthesis of an agent specification,
//! and live handoffs between the creator and the synthesized demo agent.

pub mod config;
mod engagement;
mod handoff;
pub mod orchestrator;
pub mod registry;
pub mod state;
pub mod synthesis;

pub use config::OrchestratorConfig;
pub use orchestrator::Orchestrator;
pub use registry::OrchestratorRegistry;
pub use state::OrchestratorState;
pub use synthesis::{StagedSynthesizer, Synthesizer};
