//! The orchestrator's state machine states.

use strum::Display;

/// Lifecycle states of one conversation context.
///
/// Normal progression: `Gathering → Confirming → Processing → DemoReady →
/// DemoActive`, cycling back to `Gathering` after each demo. `Completed` is
/// terminal. Failed synthesis and failed handoff construction both roll back
/// to `Gathering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum OrchestratorState {
    /// Collecting requirements through the creator persona
    Gathering,
    /// Requirements summarized, waiting for explicit user confirmation
    Confirming,
    /// Synthesis in flight; requirements are locked
    Processing,
    /// A synthesized agent is ready for handoff
    DemoReady,
    /// The demo persona is live
    DemoActive,
    /// Session closed; context awaits teardown
    Completed,
}

impl OrchestratorState {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
