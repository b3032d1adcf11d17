//! Timing parameters for the orchestrator.

use std::time::Duration;

/// Delays and ceilings governing synthesis, engagement and handoffs.
///
/// All values are per-orchestrator; contexts never share timing state.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Hard ceiling on one synthesis pass; expiry cancels and rolls back
    pub synthesis_timeout: Duration,
    /// Sampling interval of the engagement loop
    pub engagement_interval: Duration,
    /// Pause between a farewell utterance and stopping the old session
    pub farewell_grace: Duration,
    /// Pause between starting a new session and its introduction
    pub settle_delay: Duration,
    /// Delay between Close and context teardown in the registry
    pub teardown_grace: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            synthesis_timeout: Duration::from_secs(30),
            engagement_interval: Duration::from_secs(3),
            farewell_grace: Duration::from_secs(5),
            settle_delay: Duration::from_secs(3),
            teardown_grace: Duration::from_secs(10),
        }
    }
}
