//! Specification synthesis behind a swappable trait.
//!
//! The orchestrator spawns exactly one synthesis task per Processing cycle
//! and supervises it with a cancellation token and a hard timeout. The
//! default implementation wraps the pure [`SpecBuilder`] in staged pacing so
//! the caller hears progress at a natural rhythm; tests substitute stalling
//! or counting implementations.

use async_trait::async_trait;
use chorus_core::requirements::RequirementsStore;
use chorus_core::spec::{AgentSpec, CategoryTable, SpecBuilder};
use chorus_core::Result;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Produces an [`AgentSpec`] from a requirements snapshot.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, snapshot: &RequirementsStore) -> Result<AgentSpec>;
}

/// Default synthesizer: the pure builder with staged pacing around it.
pub struct StagedSynthesizer {
    builder: SpecBuilder,
    step_delay: Duration,
}

impl StagedSynthesizer {
    pub fn new(table: CategoryTable) -> Self {
        Self::with_step_delay(table, Duration::from_secs(2))
    }

    pub fn with_step_delay(table: CategoryTable, step_delay: Duration) -> Self {
        Self {
            builder: SpecBuilder::new(table),
            step_delay,
        }
    }
}

#[async_trait]
impl Synthesizer for StagedSynthesizer {
    async fn synthesize(&self, snapshot: &RequirementsStore) -> Result<AgentSpec> {
        tracing::debug!(target: "synthesis", "analyzing business type");
        tokio::time::sleep(self.step_delay).await;

        tracing::debug!(target: "synthesis", "building agent specification");
        let spec = self.builder.build(snapshot)?;
        tokio::time::sleep(self.step_delay).await;

        tracing::debug!(target: "synthesis", "finalizing configuration");
        tokio::time::sleep(self.step_delay / 2).await;

        tracing::info!(
            target: "synthesis",
            agent_type = %spec.agent_type,
            voice = %spec.voice,
            functions = spec.functions.len(),
            "specification ready"
        );
        Ok(spec)
    }
}

/// Owned handle to one in-flight synthesis supervisor.
///
/// At most one exists per context; cancelling the token promptly cancels the
/// synthesis task and its engagement loop together.
pub(crate) struct SynthesisHandle {
    pub(crate) cancel: CancellationToken,
    pub(crate) join: JoinHandle<()>,
}
