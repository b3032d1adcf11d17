//! The persona handoff protocol, both directions.
//!
//! Sequence: farewell on the outgoing session, grace delay, stop; start the
//! destination session; settle delay; context-carrying introduction; commit
//! the new handle and state in one short critical section. A failed start
//! restores a creator session so the caller is never left with no live
//! persona.

use crate::orchestrator::Orchestrator;
use crate::state::OrchestratorState;
use chorus_core::persona;
use chorus_core::spec::AgentSpec;
use chorus_core::{ChorusError, Result};
use std::sync::Arc;

impl Orchestrator {
    pub(crate) async fn handoff_to_demo(self: &Arc<Self>, spec: Arc<AgentSpec>) -> Result<()> {
        self.retire_current_session(&persona::creator_farewell(&spec))
            .await;

        let handle = match self
            .session_port()
            .start(&spec.instructions, &spec.voice)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                self.recover_from_failed_handoff("demo session start failed")
                    .await;
                return Err(ChorusError::handoff_failed(e.to_string()));
            }
        };

        tokio::time::sleep(self.config().settle_delay).await;
        self.say(&handle, &persona::demo_introduction(&spec)).await;

        // The context may have closed while the protocol ran; never
        // resurrect a terminal state.
        let committed = self
            .with_inner(|inner| {
                inner.clear_handoff_flag();
                if inner.state().is_terminal() {
                    return None;
                }
                let from = inner.state();
                inner.set_session(handle.clone());
                inner.set_state(OrchestratorState::DemoActive);
                Some(from)
            })
            .await;
        let Some(from) = committed else {
            let _ = self.session_port().stop(&handle).await;
            return Ok(());
        };
        self.note_transition(from, OrchestratorState::DemoActive, "handoff to demo")
            .await;
        Ok(())
    }

    pub(crate) async fn handoff_to_creator(self: &Arc<Self>, spec: Arc<AgentSpec>) -> Result<()> {
        self.retire_current_session(&persona::demo_farewell()).await;

        let handle = match self
            .session_port()
            .start(persona::CREATOR_INSTRUCTIONS, persona::CREATOR_VOICE)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                // The destination was the creator itself; nothing left to
                // restore. Land in Gathering so the context stays usable.
                let committed = self
                    .with_inner(|inner| {
                        inner.clear_handoff_flag();
                        if inner.state().is_terminal() {
                            return None;
                        }
                        let from = inner.state();
                        inner.set_state(OrchestratorState::Gathering);
                        Some(from)
                    })
                    .await;
                if let Some(from) = committed {
                    self.note_transition(
                        from,
                        OrchestratorState::Gathering,
                        "creator session start failed",
                    )
                    .await;
                }
                return Err(ChorusError::handoff_failed(e.to_string()));
            }
        };

        tokio::time::sleep(self.config().settle_delay).await;
        self.say(&handle, &persona::creator_feedback_prompt(&spec))
            .await;

        let committed = self
            .with_inner(|inner| {
                inner.clear_handoff_flag();
                if inner.state().is_terminal() {
                    return None;
                }
                let from = inner.state();
                inner.set_session(handle.clone());
                inner.set_demo_completed();
                inner.set_state(OrchestratorState::Gathering);
                Some(from)
            })
            .await;
        let Some(from) = committed else {
            let _ = self.session_port().stop(&handle).await;
            return Ok(());
        };
        self.note_transition(from, OrchestratorState::Gathering, "demo feedback round")
            .await;
        Ok(())
    }

    /// Farewell, grace delay, stop and clear the current handle.
    async fn retire_current_session(&self, farewell: &str) {
        let handle = self.with_inner(|inner| inner.take_session()).await;
        if let Some(handle) = handle {
            self.say(&handle, farewell).await;
            tokio::time::sleep(self.config().farewell_grace).await;
            if let Err(e) = self.session_port().stop(&handle).await {
                tracing::warn!(
                    target: "orchestrator",
                    context = %self.context_id(),
                    session = %handle.id(),
                    error = %e,
                    "failed to stop outgoing session"
                );
            }
        }
    }

    /// Best-effort creator restore after a failed outbound handoff.
    async fn recover_from_failed_handoff(&self, reason: &str) {
        match self
            .session_port()
            .start(persona::CREATOR_INSTRUCTIONS, persona::CREATOR_VOICE)
            .await
        {
            Ok(handle) => {
                self.say(&handle, persona::HANDOFF_RECOVERY).await;
                let committed = self
                    .with_inner(|inner| {
                        inner.clear_handoff_flag();
                        if inner.state().is_terminal() {
                            return None;
                        }
                        let from = inner.state();
                        inner.set_session(handle.clone());
                        inner.set_state(OrchestratorState::Gathering);
                        Some(from)
                    })
                    .await;
                let Some(from) = committed else {
                    let _ = self.session_port().stop(&handle).await;
                    return;
                };
                self.note_transition(from, OrchestratorState::Gathering, reason)
                    .await;
            }
            Err(e) => {
                tracing::error!(
                    target: "orchestrator",
                    context = %self.context_id(),
                    error = %e,
                    "could not restore creator session"
                );
                let committed = self
                    .with_inner(|inner| {
                        inner.clear_handoff_flag();
                        if inner.state().is_terminal() {
                            return None;
                        }
                        let from = inner.state();
                        inner.set_state(OrchestratorState::Gathering);
                        Some(from)
                    })
                    .await;
                if let Some(from) = committed {
                    self.note_transition(from, OrchestratorState::Gathering, reason)
                        .await;
                }
            }
        }
    }
}
