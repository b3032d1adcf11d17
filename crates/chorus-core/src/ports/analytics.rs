//! External interface for call bookkeeping.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Terminal status of one conversation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Completed,
    Abandoned,
    Failed,
}

/// Best-effort call bookkeeping. Every method may fail; callers log and
/// carry on, so analytics never blocks conversation flow.
#[async_trait]
pub trait AnalyticsPort: Send + Sync {
    /// Records the start of a conversation with its initial persona.
    async fn start_call(&self, context_id: &str, initial_persona: &str) -> Result<()>;

    /// Records a state transition with a short reason.
    async fn log_transition(
        &self,
        context_id: &str,
        from: &str,
        to: &str,
        reason: &str,
    ) -> Result<()>;

    /// Records end-of-call with an optional caller rating (0-10).
    async fn end_call(
        &self,
        context_id: &str,
        status: CallStatus,
        rating: Option<u8>,
    ) -> Result<()>;
}
