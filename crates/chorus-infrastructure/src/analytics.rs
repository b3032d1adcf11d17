//! In-memory call bookkeeping logged through `tracing`.

use async_trait::async_trait;
use chorus_core::ports::{AnalyticsPort, CallStatus};
use chorus_core::{ChorusError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub at: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// One conversation's bookkeeping from `start_call` to `end_call`.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    pub context_id: String,
    pub initial_persona: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub transitions: Vec<TransitionRecord>,
    pub status: Option<CallStatus>,
    pub rating: Option<u8>,
}

impl CallRecord {
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|ended| ended - self.started_at)
    }
}

/// `AnalyticsPort` keeping per-call records in memory and mirroring every
/// event to `tracing`.
#[derive(Default)]
pub struct TracingAnalytics {
    calls: Mutex<HashMap<String, CallRecord>>,
}

impl TracingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one call's record, if the call was ever started.
    pub async fn record(&self, context_id: &str) -> Option<CallRecord> {
        self.calls.lock().await.get(context_id).cloned()
    }

    pub async fn active_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .values()
            .filter(|r| r.ended_at.is_none())
            .count()
    }
}

#[async_trait]
impl AnalyticsPort for TracingAnalytics {
    async fn start_call(&self, context_id: &str, initial_persona: &str) -> Result<()> {
        tracing::info!(
            target: "analytics",
            context = context_id,
            persona = initial_persona,
            "call started"
        );
        let mut calls = self.calls.lock().await;
        if calls.contains_key(context_id) {
            return Err(ChorusError::analytics(format!(
                "call already started for context {}",
                context_id
            )));
        }
        calls.insert(
            context_id.to_string(),
            CallRecord {
                context_id: context_id.to_string(),
                initial_persona: initial_persona.to_string(),
                started_at: Utc::now(),
                ended_at: None,
                transitions: Vec::new(),
                status: None,
                rating: None,
            },
        );
        Ok(())
    }

    async fn log_transition(
        &self,
        context_id: &str,
        from: &str,
        to: &str,
        reason: &str,
    ) -> Result<()> {
        tracing::info!(
            target: "analytics",
            context = context_id,
            from,
            to,
            reason,
            "transition"
        );
        let mut calls = self.calls.lock().await;
        let record = calls.get_mut(context_id).ok_or_else(|| {
            ChorusError::analytics(format!("unknown context {}", context_id))
        })?;
        record.transitions.push(TransitionRecord {
            at: Utc::now(),
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn end_call(
        &self,
        context_id: &str,
        status: CallStatus,
        rating: Option<u8>,
    ) -> Result<()> {
        tracing::info!(
            target: "analytics",
            context = context_id,
            status = ?status,
            rating = ?rating,
            "call ended"
        );
        let mut calls = self.calls.lock().await;
        let record = calls.get_mut(context_id).ok_or_else(|| {
            ChorusError::analytics(format!("unknown context {}", context_id))
        })?;
        record.ended_at = Some(Utc::now());
        record.status = Some(status);
        record.rating = rating;
        Ok(())
    }
}
