#![allow(dead_code)]

use async_trait::async_trait;
use chorus_core::ports::{
    AnalyticsPort, CallStatus, PersistencePort, SessionHandle, SessionPort,
};
use chorus_core::requirements::RequirementsStore;
use chorus_core::spec::{AgentSpec, CategoryTable, SpecBuilder};
use chorus_core::{ChorusError, Result};
use chorus_orchestrator::{Orchestrator, OrchestratorConfig, OrchestratorState, Synthesizer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Session transport fake recording every call, with scriptable start
/// failures. Stop calls and teardowns are tracked separately: teardown side
/// effects run only on the first stop of a handle, as the port contract
/// requires.
pub struct FakeSessionPort {
    pub starts: Mutex<Vec<(String, String)>>,
    pub utterances: Mutex<Vec<(String, String)>>,
    pub stops: Mutex<Vec<Uuid>>,
    torn_down: Mutex<std::collections::HashSet<Uuid>>,
    queued_start_failures: Mutex<usize>,
}

impl FakeSessionPort {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            starts: Mutex::new(Vec::new()),
            utterances: Mutex::new(Vec::new()),
            stops: Mutex::new(Vec::new()),
            torn_down: Mutex::new(std::collections::HashSet::new()),
            queued_start_failures: Mutex::new(0),
        })
    }

    /// The next `start` call fails; queued failures stack.
    pub fn fail_next_start(&self) {
        *self.queued_start_failures.lock().unwrap() += 1;
    }

    /// Every spoken line, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.utterances
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Voices passed to `start`, in order.
    pub fn started_voices(&self) -> Vec<String> {
        self.starts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, voice)| voice.clone())
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.lock().unwrap().len()
    }

    /// Handles whose teardown side effects actually ran.
    pub fn teardown_count(&self) -> usize {
        self.torn_down.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionPort for FakeSessionPort {
    async fn start(&self, instructions: &str, voice: &str) -> Result<SessionHandle> {
        {
            let mut queued = self.queued_start_failures.lock().unwrap();
            if *queued > 0 {
                *queued -= 1;
                return Err(ChorusError::session("transport refused"));
            }
        }
        self.starts
            .lock()
            .unwrap()
            .push((instructions.to_string(), voice.to_string()));
        Ok(SessionHandle::new(voice))
    }

    async fn speak(&self, handle: &SessionHandle, text: &str) -> Result<()> {
        self.utterances
            .lock()
            .unwrap()
            .push((handle.persona().to_string(), text.to_string()));
        Ok(())
    }

    async fn stop(&self, handle: &SessionHandle) -> Result<()> {
        self.stops.lock().unwrap().push(handle.id());
        self.torn_down.lock().unwrap().insert(handle.id());
        Ok(())
    }
}

pub struct FakePersistence {
    pub saved: Mutex<Vec<(RequirementsStore, AgentSpec)>>,
    pub fail_saves: bool,
}

impl FakePersistence {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            saved: Mutex::new(Vec::new()),
            fail_saves: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            saved: Mutex::new(Vec::new()),
            fail_saves: true,
        })
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

#[async_trait]
impl PersistencePort for FakePersistence {
    async fn save(&self, requirements: &RequirementsStore, spec: &AgentSpec) -> Result<String> {
        if self.fail_saves {
            return Err(ChorusError::persistence("disk full"));
        }
        self.saved
            .lock()
            .unwrap()
            .push((requirements.clone(), spec.clone()));
        Ok(Uuid::new_v4().to_string())
    }

    async fn load(&self, _id: &str) -> Result<Option<(RequirementsStore, AgentSpec)>> {
        Ok(None)
    }
}

pub struct FakeAnalytics {
    pub started: Mutex<Vec<(String, String)>>,
    pub transitions: Mutex<Vec<(String, String, String, String)>>,
    pub ended: Mutex<Vec<(String, CallStatus, Option<u8>)>>,
}

impl FakeAnalytics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Mutex::new(Vec::new()),
            transitions: Mutex::new(Vec::new()),
            ended: Mutex::new(Vec::new()),
        })
    }

    pub fn transition_pairs(&self) -> Vec<(String, String)> {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, from, to, _)| (from.clone(), to.clone()))
            .collect()
    }
}

#[async_trait]
impl AnalyticsPort for FakeAnalytics {
    async fn start_call(&self, context_id: &str, initial_persona: &str) -> Result<()> {
        self.started
            .lock()
            .unwrap()
            .push((context_id.to_string(), initial_persona.to_string()));
        Ok(())
    }

    async fn log_transition(
        &self,
        context_id: &str,
        from: &str,
        to: &str,
        reason: &str,
    ) -> Result<()> {
        self.transitions.lock().unwrap().push((
            context_id.to_string(),
            from.to_string(),
            to.to_string(),
            reason.to_string(),
        ));
        Ok(())
    }

    async fn end_call(
        &self,
        context_id: &str,
        status: CallStatus,
        rating: Option<u8>,
    ) -> Result<()> {
        self.ended
            .lock()
            .unwrap()
            .push((context_id.to_string(), status, rating));
        Ok(())
    }
}

/// Builds immediately via the pure builder and counts invocations.
pub struct InstantSynthesizer {
    builder: SpecBuilder,
    pub calls: AtomicUsize,
}

impl InstantSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            builder: SpecBuilder::new(CategoryTable::default()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for InstantSynthesizer {
    async fn synthesize(&self, snapshot: &RequirementsStore) -> Result<AgentSpec> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.builder.build(snapshot)
    }
}

/// Builds after a fixed delay; exercises the engagement loop.
pub struct SlowSynthesizer {
    builder: SpecBuilder,
    delay: Duration,
}

impl SlowSynthesizer {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            builder: SpecBuilder::new(CategoryTable::default()),
            delay,
        })
    }
}

#[async_trait]
impl Synthesizer for SlowSynthesizer {
    async fn synthesize(&self, snapshot: &RequirementsStore) -> Result<AgentSpec> {
        tokio::time::sleep(self.delay).await;
        self.builder.build(snapshot)
    }
}

/// Never completes; exercises the timeout ceiling and cancellation.
pub struct NeverSynthesizer;

#[async_trait]
impl Synthesizer for NeverSynthesizer {
    async fn synthesize(&self, _snapshot: &RequirementsStore) -> Result<AgentSpec> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

pub struct FailingSynthesizer;

#[async_trait]
impl Synthesizer for FailingSynthesizer {
    async fn synthesize(&self, _snapshot: &RequirementsStore) -> Result<AgentSpec> {
        Err(ChorusError::synthesis_failed("model unavailable"))
    }
}

pub struct Harness {
    pub session: Arc<FakeSessionPort>,
    pub persistence: Arc<FakePersistence>,
    pub analytics: Arc<FakeAnalytics>,
    pub orchestrator: Arc<Orchestrator>,
}

pub fn harness_with(synthesizer: Arc<dyn Synthesizer>) -> Harness {
    let session = FakeSessionPort::new();
    let persistence = FakePersistence::new();
    let analytics = FakeAnalytics::new();
    let orchestrator = Arc::new(Orchestrator::new(
        "ctx-1",
        OrchestratorConfig::default(),
        session.clone(),
        persistence.clone(),
        analytics.clone(),
        synthesizer,
    ));
    Harness {
        session,
        persistence,
        analytics,
        orchestrator,
    }
}

pub fn harness() -> Harness {
    harness_with(InstantSynthesizer::new())
}

/// Feeds the minimum required fields and confirms.
pub async fn gather_and_confirm(orchestrator: &Arc<Orchestrator>) {
    orchestrator
        .store_requirement("business_name", "Tony's Pizza")
        .await
        .unwrap();
    orchestrator
        .store_requirement("business_type", "pizza restaurant")
        .await
        .unwrap();
    orchestrator.confirm_requirements().await.unwrap();
}

/// Polls (under paused time) until the state is reached.
pub async fn wait_for_state(orchestrator: &Arc<Orchestrator>, expected: OrchestratorState) {
    for _ in 0..600 {
        if orchestrator.state().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!(
        "timed out waiting for {}, still {}",
        expected,
        orchestrator.state().await
    );
}
