//! External interface to the live session transport.

use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Opaque reference to one live persona session.
///
/// Exactly one handle is current per conversation context; the orchestrator
/// only starts a new one after the previous handle has fully stopped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle {
    id: Uuid,
    persona: String,
}

impl SessionHandle {
    /// Creates a fresh handle. Intended for `SessionPort` implementations.
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            persona: persona.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Label of the persona driving this session.
    pub fn persona(&self) -> &str {
        &self.persona
    }
}

/// Starts and stops live persona sessions and speaks through them.
///
/// Implementations bind this to the actual audio/voice transport; the
/// orchestrator only sees handles.
#[async_trait]
pub trait SessionPort: Send + Sync {
    /// Starts a live session for the given persona instructions and voice.
    async fn start(&self, instructions: &str, voice: &str) -> Result<SessionHandle>;

    /// Asks the session to speak. Failures are logged by callers, never
    /// propagated as orchestrator errors.
    async fn speak(&self, handle: &SessionHandle, text: &str) -> Result<()>;

    /// Stops the session. Must be idempotent: stopping an already-stopped
    /// handle succeeds without re-running teardown side effects.
    async fn stop(&self, handle: &SessionHandle) -> Result<()>;
}
