//! Per-context conversation orchestrator.
//!
//! One `Orchestrator` owns the full lifecycle of a single conversation: the
//! requirements store, the state machine, the current live session handle and
//! at most one in-flight synthesis task. All ports come in as `Arc<dyn _>` so
//! tests inject fakes.
//!
//! Locking discipline: `inner` is held only for guard checks and field
//! assignment. Handoffs and synthesis run outside the lock; commits re-take
//! it briefly at the end.

use crate::config::OrchestratorConfig;
use crate::engagement;
use crate::state::OrchestratorState;
use crate::synthesis::{SynthesisHandle, Synthesizer};
use chorus_core::persona;
use chorus_core::ports::{AnalyticsPort, CallStatus, PersistencePort, SessionHandle, SessionPort};
use chorus_core::requirements::{RequirementsStore, StoreOutcome};
use chorus_core::spec::AgentSpec;
use chorus_core::{ChorusError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub struct Orchestrator {
    context_id: String,
    config: OrchestratorConfig,
    session: Arc<dyn SessionPort>,
    persistence: Arc<dyn PersistencePort>,
    analytics: Arc<dyn AnalyticsPort>,
    synthesizer: Arc<dyn Synthesizer>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: OrchestratorState,
    requirements: RequirementsStore,
    spec: Option<Arc<AgentSpec>>,
    current_session: Option<SessionHandle>,
    demo_completed: bool,
    handoff_in_flight: bool,
    synthesis: Option<SynthesisHandle>,
}

impl Orchestrator {
    pub fn new(
        context_id: impl Into<String>,
        config: OrchestratorConfig,
        session: Arc<dyn SessionPort>,
        persistence: Arc<dyn PersistencePort>,
        analytics: Arc<dyn AnalyticsPort>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            context_id: context_id.into(),
            config,
            session,
            persistence,
            analytics,
            synthesizer,
            inner: Mutex::new(Inner {
                state: OrchestratorState::Gathering,
                requirements: RequirementsStore::new(),
                spec: None,
                current_session: None,
                demo_completed: false,
                handoff_in_flight: false,
                synthesis: None,
            }),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub async fn state(&self) -> OrchestratorState {
        self.inner.lock().await.state
    }

    /// The most recently synthesized spec, if any.
    pub async fn current_spec(&self) -> Option<Arc<AgentSpec>> {
        self.inner.lock().await.spec.clone()
    }

    /// Starts the creator session and greets the caller.
    ///
    /// Valid exactly once per context: a live session, a begin already in
    /// flight, or a closed context all refuse with `NotReady`, so no second
    /// persona can ever go live alongside the first.
    ///
    /// # Errors
    ///
    /// `NotReady` when the context already has (or had) a session.
    /// Propagates the session transport error when the creator session cannot
    /// be started; the context then has no live session and should be closed.
    pub async fn begin(&self) -> Result<String> {
        {
            let mut inner = self.inner.lock().await;
            if inner.state.is_terminal()
                || inner.current_session.is_some()
                || inner.handoff_in_flight
            {
                return Err(ChorusError::NotReady);
            }
            inner.handoff_in_flight = true;
        }
        let handle = match self
            .session
            .start(persona::CREATOR_INSTRUCTIONS, persona::CREATOR_VOICE)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                self.inner.lock().await.handoff_in_flight = false;
                return Err(e);
            }
        };
        tracing::info!(
            target: "orchestrator",
            context = %self.context_id,
            session = %handle.id(),
            "creator session started"
        );
        let committed = {
            let mut inner = self.inner.lock().await;
            inner.handoff_in_flight = false;
            if inner.state.is_terminal() {
                false
            } else {
                inner.current_session = Some(handle.clone());
                true
            }
        };
        if !committed {
            let _ = self.session.stop(&handle).await;
            return Err(ChorusError::NotReady);
        }
        if let Err(e) = self
            .analytics
            .start_call(&self.context_id, persona::CREATOR_NAME)
            .await
        {
            tracing::warn!(target: "orchestrator", error = %e, "start_call failed");
        }
        self.say(&handle, persona::CREATOR_GREETING).await;
        Ok(persona::CREATOR_GREETING.to_string())
    }

    /// Stores one requirement field.
    ///
    /// Filler and too-short values are not stored; the returned string asks
    /// the caller again instead of erroring.
    ///
    /// # Errors
    ///
    /// Returns [`ChorusError::Locked`] if and only if synthesis is in flight.
    pub async fn store_requirement(&self, field: &str, value: &str) -> Result<String> {
        let mut inner = self.inner.lock().await;
        if inner.state == OrchestratorState::Processing {
            return Err(ChorusError::Locked);
        }
        let label = field.replace('_', " ");
        match inner.requirements.apply(field, value) {
            StoreOutcome::Stored(_) => Ok(format!("Got it! I've noted the {}.", label)),
            StoreOutcome::Rejected => Ok(format!(
                "I didn't quite catch the {}. Could you tell me that again?",
                label
            )),
        }
    }

    /// What is still missing, phrased for the live persona.
    pub async fn requirements_status(&self) -> String {
        let inner = self.inner.lock().await;
        let required = inner.requirements.missing_required();
        let recommended = inner.requirements.missing_recommended();
        if !required.is_empty() {
            format!("I still need the {} to continue.", required.join(" and "))
        } else if !recommended.is_empty() {
            format!(
                "I have everything required. Optionally, you could also share: {}.",
                recommended.join(", ")
            )
        } else {
            "I have everything I need!".to_string()
        }
    }

    /// Summary of everything gathered so far.
    ///
    /// # Errors
    ///
    /// Returns [`ChorusError::IncompleteRequirements`] when the required
    /// fields are not yet present.
    pub async fn requirements_summary(&self) -> Result<String> {
        let inner = self.inner.lock().await;
        if !inner.requirements.is_valid_for_processing() {
            return Err(ChorusError::incomplete(inner.requirements.missing_required()));
        }
        Ok(inner.requirements.summary())
    }

    /// Validates the required fields and moves to Confirming.
    ///
    /// Returns the summary the persona reads back for explicit confirmation.
    ///
    /// # Errors
    ///
    /// `Locked` during Processing, `IncompleteRequirements` when business name
    /// or type are missing, `NotReady` from post-confirmation states.
    pub async fn confirm_requirements(&self) -> Result<String> {
        let (from, summary) = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                OrchestratorState::Processing => return Err(ChorusError::Locked),
                OrchestratorState::Gathering | OrchestratorState::Confirming => {}
                _ => return Err(ChorusError::NotReady),
            }
            if !inner.requirements.is_valid_for_processing() {
                return Err(ChorusError::incomplete(inner.requirements.missing_required()));
            }
            let from = inner.state;
            inner.state = OrchestratorState::Confirming;
            (from, inner.requirements.summary())
        };
        if from != OrchestratorState::Confirming {
            self.note_transition(from, OrchestratorState::Confirming, "summary presented")
                .await;
        }
        Ok(summary)
    }

    /// Locks the store and spawns the synthesis supervisor.
    ///
    /// Returns immediately; the supervisor announces the outcome on the live
    /// session when it finishes.
    ///
    /// # Errors
    ///
    /// `AlreadyProcessing` if a synthesis task is in flight, `NotConfirmed`
    /// from any state other than Confirming.
    pub async fn finalize_requirements(self: &Arc<Self>) -> Result<String> {
        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                OrchestratorState::Processing => return Err(ChorusError::AlreadyProcessing),
                OrchestratorState::Confirming => {}
                _ => return Err(ChorusError::NotConfirmed),
            }
            inner.state = OrchestratorState::Processing;

            let snapshot = inner.requirements.clone();
            let handle = inner.current_session.clone();
            let cancel = CancellationToken::new();
            let this = Arc::clone(self);
            let token = cancel.clone();
            // Spawning inside the critical section keeps the Processing
            // transition and the supervisor handle atomic with respect to
            // close_session.
            let join = tokio::spawn(async move {
                this.run_synthesis(snapshot, handle, token).await;
            });
            inner.synthesis = Some(SynthesisHandle { cancel, join });
        }
        self.note_transition(
            OrchestratorState::Confirming,
            OrchestratorState::Processing,
            "requirements finalized",
        )
        .await;
        Ok("Your agent is being created now. This usually takes under a minute.".to_string())
    }

    async fn run_synthesis(
        self: Arc<Self>,
        snapshot: RequirementsStore,
        handle: Option<SessionHandle>,
        cancel: CancellationToken,
    ) {
        let engagement_cancel = cancel.child_token();
        let engagement = handle.map(|h| {
            tokio::spawn(engagement::run(
                Arc::clone(&self.session),
                h,
                engagement_cancel.clone(),
                self.config.engagement_interval,
            ))
        });

        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = tokio::time::timeout(
                self.config.synthesis_timeout,
                self.synthesizer.synthesize(&snapshot),
            ) => Some(match result {
                Ok(inner) => inner,
                Err(_) => Err(ChorusError::SynthesisTimeout),
            }),
        };

        engagement_cancel.cancel();
        if let Some(task) = engagement {
            let _ = task.await;
        }

        match outcome {
            Some(Ok(spec)) => self.complete_synthesis(snapshot, spec).await,
            Some(Err(e)) => self.fail_synthesis(e).await,
            None => {
                tracing::debug!(
                    target: "orchestrator",
                    context = %self.context_id,
                    "synthesis cancelled"
                );
            }
        }
    }

    async fn complete_synthesis(&self, snapshot: RequirementsStore, spec: AgentSpec) {
        if let Err(e) = self.persistence.save(&snapshot, &spec).await {
            tracing::warn!(
                target: "orchestrator",
                context = %self.context_id,
                error = %e,
                "failed to persist agent configuration"
            );
        }
        let spec = Arc::new(spec);
        let handle = {
            let mut inner = self.inner.lock().await;
            if inner.state != OrchestratorState::Processing {
                return;
            }
            inner.state = OrchestratorState::DemoReady;
            inner.spec = Some(Arc::clone(&spec));
            inner.synthesis = None;
            inner.current_session.clone()
        };
        self.note_transition(
            OrchestratorState::Processing,
            OrchestratorState::DemoReady,
            "synthesis complete",
        )
        .await;
        if let Some(handle) = handle {
            self.say(&handle, &persona::demo_ready_announcement(&spec))
                .await;
        }
    }

    async fn fail_synthesis(&self, error: ChorusError) {
        tracing::warn!(
            target: "orchestrator",
            context = %self.context_id,
            error = %error,
            "synthesis failed, rolling back"
        );
        let handle = {
            let mut inner = self.inner.lock().await;
            if inner.state != OrchestratorState::Processing {
                return;
            }
            inner.state = OrchestratorState::Gathering;
            inner.synthesis = None;
            inner.current_session.clone()
        };
        self.note_transition(
            OrchestratorState::Processing,
            OrchestratorState::Gathering,
            &format!("synthesis failed: {}", error),
        )
        .await;
        if let Some(handle) = handle {
            self.say(&handle, persona::SYNTHESIS_APOLOGY).await;
        }
    }

    /// Progress phrasing while synthesis is in flight.
    pub async fn processing_status(&self) -> String {
        match self.inner.lock().await.state {
            OrchestratorState::Processing => {
                "Your agent is still being configured. Just a few more moments!".to_string()
            }
            OrchestratorState::DemoReady => {
                "Your agent is ready! Say the word and I'll connect you.".to_string()
            }
            OrchestratorState::DemoActive => "You're talking to your agent right now.".to_string(),
            _ => "Agent creation hasn't started yet.".to_string(),
        }
    }

    /// Hands the caller to the synthesized demo agent.
    ///
    /// The returned string acknowledges the switch; the handoff itself runs
    /// in the background so the farewell and grace delays never block the
    /// caller's tool invocation.
    ///
    /// # Errors
    ///
    /// `NotReady` unless the state is DemoReady, or a completed demo exists
    /// to retry. Racing calls yield exactly one handoff.
    pub async fn start_demo(self: &Arc<Self>) -> Result<String> {
        let spec = {
            let mut inner = self.inner.lock().await;
            if inner.handoff_in_flight {
                return Err(ChorusError::NotReady);
            }
            let retryable = inner.demo_completed
                && matches!(
                    inner.state,
                    OrchestratorState::Gathering | OrchestratorState::Confirming
                );
            if inner.state != OrchestratorState::DemoReady && !retryable {
                return Err(ChorusError::NotReady);
            }
            let spec = inner.spec.clone().ok_or(ChorusError::NotReady)?;
            inner.handoff_in_flight = true;
            spec
        };
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.handoff_to_demo(spec).await {
                tracing::warn!(
                    target: "orchestrator",
                    context = %this.context_id,
                    error = %e,
                    "handoff to demo failed"
                );
            }
        });
        Ok("Connecting you to your new agent now!".to_string())
    }

    /// Reconnects to the demo after a previous round of feedback.
    pub async fn try_demo_again(self: &Arc<Self>) -> Result<String> {
        self.start_demo().await
    }

    /// Returns the caller from the demo to the creator persona.
    ///
    /// # Errors
    ///
    /// `NotReady` unless the demo is active.
    pub async fn handoff_back(self: &Arc<Self>) -> Result<String> {
        let spec = {
            let mut inner = self.inner.lock().await;
            if inner.handoff_in_flight || inner.state != OrchestratorState::DemoActive {
                return Err(ChorusError::NotReady);
            }
            let spec = inner.spec.clone().ok_or(ChorusError::NotReady)?;
            inner.handoff_in_flight = true;
            spec
        };
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.handoff_to_creator(spec).await {
                tracing::warn!(
                    target: "orchestrator",
                    context = %this.context_id,
                    error = %e,
                    "handoff back to creator failed"
                );
            }
        });
        Ok(format!("Connecting you back to {} now!", persona::CREATOR_NAME))
    }

    /// Closes the conversation from any non-terminal state.
    ///
    /// Cancels and awaits any in-flight synthesis before reporting success,
    /// speaks a closing message, stops the live session and records the call
    /// outcome.
    pub async fn close_session(&self, rating: Option<u8>) -> Result<String> {
        let synthesis = {
            let mut inner = self.inner.lock().await;
            if inner.state.is_terminal() {
                return Ok(persona::closing_message(inner.spec.as_deref()));
            }
            inner.synthesis.take()
        };
        if let Some(handle) = synthesis {
            handle.cancel.cancel();
            if let Err(e) = handle.join.await {
                tracing::warn!(
                    target: "orchestrator",
                    context = %self.context_id,
                    error = %e,
                    "synthesis supervisor panicked"
                );
            }
        }

        let (from, spec, handle, demo_completed) = {
            let mut inner = self.inner.lock().await;
            let from = inner.state;
            inner.state = OrchestratorState::Completed;
            (
                from,
                inner.spec.clone(),
                inner.current_session.take(),
                inner.demo_completed,
            )
        };
        self.note_transition(from, OrchestratorState::Completed, "session closed")
            .await;

        let message = persona::closing_message(spec.as_deref());
        if let Some(handle) = &handle {
            self.say(handle, &message).await;
            if let Err(e) = self.session.stop(handle).await {
                tracing::warn!(
                    target: "orchestrator",
                    context = %self.context_id,
                    error = %e,
                    "failed to stop session"
                );
            }
        }

        let status = if spec.is_some() || demo_completed {
            CallStatus::Completed
        } else {
            CallStatus::Abandoned
        };
        if let Err(e) = self.analytics.end_call(&self.context_id, status, rating).await {
            tracing::warn!(target: "orchestrator", error = %e, "end_call failed");
        }
        Ok(message)
    }

    pub(crate) async fn note_transition(
        &self,
        from: OrchestratorState,
        to: OrchestratorState,
        reason: &str,
    ) {
        tracing::info!(
            target: "orchestrator",
            context = %self.context_id,
            from = %from,
            to = %to,
            reason,
            "state transition"
        );
        if let Err(e) = self
            .analytics
            .log_transition(&self.context_id, &from.to_string(), &to.to_string(), reason)
            .await
        {
            tracing::warn!(target: "orchestrator", error = %e, "log_transition failed");
        }
    }

    /// Speaks on a session, logging failures without propagating them.
    pub(crate) async fn say(&self, handle: &SessionHandle, text: &str) {
        if let Err(e) = self.session.speak(handle, text).await {
            tracing::warn!(
                target: "orchestrator",
                context = %self.context_id,
                session = %handle.id(),
                error = %e,
                "utterance failed"
            );
        }
    }

    pub(crate) async fn with_inner<T>(&self, f: impl FnOnce(&mut InnerView<'_>) -> T) -> T {
        let mut inner = self.inner.lock().await;
        let mut view = InnerView { inner: &mut inner };
        f(&mut view)
    }

    pub(crate) fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub(crate) fn session_port(&self) -> &Arc<dyn SessionPort> {
        &self.session
    }
}

/// Restricted mutable view over `Inner` for the handoff module.
pub(crate) struct InnerView<'a> {
    inner: &'a mut Inner,
}

impl InnerView<'_> {
    pub(crate) fn state(&self) -> OrchestratorState {
        self.inner.state
    }

    pub(crate) fn set_state(&mut self, state: OrchestratorState) {
        self.inner.state = state;
    }

    pub(crate) fn take_session(&mut self) -> Option<SessionHandle> {
        self.inner.current_session.take()
    }

    pub(crate) fn set_session(&mut self, handle: SessionHandle) {
        self.inner.current_session = Some(handle);
    }

    pub(crate) fn set_demo_completed(&mut self) {
        self.inner.demo_completed = true;
    }

    pub(crate) fn clear_handoff_flag(&mut self) {
        self.inner.handoff_in_flight = false;
    }
}
