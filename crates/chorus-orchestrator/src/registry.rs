//! Process-wide map of conversation contexts.

use crate::config::OrchestratorConfig;
use crate::orchestrator::Orchestrator;
use crate::synthesis::Synthesizer;
use chorus_core::ports::{AnalyticsPort, PersistencePort, SessionPort};
use chorus_core::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns one [`Orchestrator`] per context id.
///
/// Contexts are fully independent; the registry only maps ids to contexts
/// and schedules teardown. A closed context stays resolvable for the
/// teardown grace so late tool invocations still find it (and get terminal
/// state answers) instead of spawning a fresh context.
pub struct OrchestratorRegistry {
    contexts: RwLock<HashMap<String, Arc<Orchestrator>>>,
    config: OrchestratorConfig,
    session: Arc<dyn SessionPort>,
    persistence: Arc<dyn PersistencePort>,
    analytics: Arc<dyn AnalyticsPort>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl OrchestratorRegistry {
    pub fn new(
        config: OrchestratorConfig,
        session: Arc<dyn SessionPort>,
        persistence: Arc<dyn PersistencePort>,
        analytics: Arc<dyn AnalyticsPort>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
            config,
            session,
            persistence,
            analytics,
            synthesizer,
        }
    }

    /// Resolves a context, creating it on first sight of the id.
    pub async fn get_or_create(&self, context_id: &str) -> Arc<Orchestrator> {
        if let Some(existing) = self.contexts.read().await.get(context_id) {
            return Arc::clone(existing);
        }
        let mut contexts = self.contexts.write().await;
        // Racing creators resolve to whichever entry landed first.
        Arc::clone(contexts.entry(context_id.to_string()).or_insert_with(|| {
            tracing::info!(target: "registry", context = context_id, "creating context");
            Arc::new(Orchestrator::new(
                context_id,
                self.config.clone(),
                Arc::clone(&self.session),
                Arc::clone(&self.persistence),
                Arc::clone(&self.analytics),
                Arc::clone(&self.synthesizer),
            ))
        }))
    }

    pub async fn get(&self, context_id: &str) -> Option<Arc<Orchestrator>> {
        self.contexts.read().await.get(context_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.contexts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contexts.read().await.is_empty()
    }

    /// Closes a context and schedules its removal after the teardown grace.
    ///
    /// Returns the closing message, or `None` for an unknown id.
    pub async fn close(self: &Arc<Self>, context_id: &str, rating: Option<u8>) -> Option<Result<String>> {
        let orchestrator = self.get(context_id).await?;
        let result = orchestrator.close_session(rating).await;

        let registry = Arc::clone(self);
        let id = context_id.to_string();
        let grace = self.config.teardown_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if registry.contexts.write().await.remove(&id).is_some() {
                tracing::info!(target: "registry", context = %id, "context torn down");
            }
        });
        Some(result)
    }
}
