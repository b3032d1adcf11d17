mod common;

use chorus_core::persona::ENGAGEMENT_FILLERS;
use chorus_core::ports::CallStatus;
use chorus_core::ChorusError;
use chorus_orchestrator::OrchestratorState;
use common::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn racing_finalize_yields_one_synthesis() {
    let synthesizer = InstantSynthesizer::new();
    let h = harness_with(synthesizer.clone());
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    gather_and_confirm(orchestrator).await;

    let (first, second) = tokio::join!(
        orchestrator.finalize_requirements(),
        orchestrator.finalize_requirements(),
    );
    let errors = [first, second]
        .into_iter()
        .filter_map(|r| r.err())
        .collect::<Vec<_>>();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ChorusError::AlreadyProcessing));

    wait_for_state(orchestrator, OrchestratorState::DemoReady).await;
    assert_eq!(synthesizer.call_count(), 1);
    assert_eq!(h.persistence.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn long_synthesis_speaks_exactly_two_fillers() {
    let h = harness_with(SlowSynthesizer::new(Duration::from_secs(12)));
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    gather_and_confirm(orchestrator).await;
    orchestrator.finalize_requirements().await.unwrap();
    wait_for_state(orchestrator, OrchestratorState::DemoReady).await;

    let spoken = h.session.spoken();
    let fillers = spoken
        .iter()
        .filter(|s| ENGAGEMENT_FILLERS.contains(&s.as_str()))
        .count();
    assert_eq!(fillers, 2);
    assert!(spoken.iter().any(|s| s.contains("ready to test")));
}

#[tokio::test(start_paused = true)]
async fn quick_synthesis_skips_fillers() {
    let h = harness_with(SlowSynthesizer::new(Duration::from_secs(1)));
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    gather_and_confirm(orchestrator).await;
    orchestrator.finalize_requirements().await.unwrap();
    wait_for_state(orchestrator, OrchestratorState::DemoReady).await;

    let spoken = h.session.spoken();
    assert!(!spoken
        .iter()
        .any(|s| ENGAGEMENT_FILLERS.contains(&s.as_str())));
}

#[tokio::test(start_paused = true)]
async fn stalled_synthesis_rolls_back_at_the_ceiling() {
    let h = harness_with(Arc::new(NeverSynthesizer));
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    gather_and_confirm(orchestrator).await;
    orchestrator.finalize_requirements().await.unwrap();

    wait_for_state(orchestrator, OrchestratorState::Gathering).await;

    let spoken = h.session.spoken();
    assert!(spoken.iter().any(|s| s.contains("issue creating your agent")));
    assert!(h
        .analytics
        .transition_pairs()
        .contains(&("processing".to_string(), "gathering".to_string())));
    assert!(orchestrator.current_spec().await.is_none());
    assert_eq!(h.persistence.save_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_synthesis_apologizes_and_rolls_back() {
    let h = harness_with(Arc::new(FailingSynthesizer));
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    gather_and_confirm(orchestrator).await;
    orchestrator.finalize_requirements().await.unwrap();

    wait_for_state(orchestrator, OrchestratorState::Gathering).await;
    assert!(h
        .session
        .spoken()
        .iter()
        .any(|s| s.contains("issue creating your agent")));
}

#[tokio::test(start_paused = true)]
async fn close_cancels_in_flight_synthesis_silently() {
    let h = harness_with(Arc::new(NeverSynthesizer));
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    gather_and_confirm(orchestrator).await;
    orchestrator.finalize_requirements().await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    orchestrator.close_session(None).await.unwrap();
    assert_eq!(orchestrator.state().await, OrchestratorState::Completed);

    // No apology, no rollback announcement after the cancel.
    let spoken = h.session.spoken();
    assert!(!spoken.iter().any(|s| s.contains("issue creating your agent")));
    assert_eq!(h.analytics.ended.lock().unwrap()[0].1, CallStatus::Abandoned);
}

#[tokio::test(start_paused = true)]
async fn finalize_requires_confirmation_first() {
    let h = harness();
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();
    orchestrator
        .store_requirement("business_name", "Tony's Pizza")
        .await
        .unwrap();
    orchestrator
        .store_requirement("business_type", "pizza restaurant")
        .await
        .unwrap();

    let err = orchestrator.finalize_requirements().await.unwrap_err();
    assert!(matches!(err, ChorusError::NotConfirmed));
    assert!(err.advisory().contains("summary"));
    assert_eq!(orchestrator.state().await, OrchestratorState::Gathering);
}

#[tokio::test(start_paused = true)]
async fn processing_status_follows_the_lifecycle() {
    let h = harness_with(SlowSynthesizer::new(Duration::from_secs(6)));
    let orchestrator = &h.orchestrator;
    orchestrator.begin().await.unwrap();

    assert!(orchestrator
        .processing_status()
        .await
        .contains("hasn't started"));

    gather_and_confirm(orchestrator).await;
    orchestrator.finalize_requirements().await.unwrap();
    assert!(orchestrator
        .processing_status()
        .await
        .contains("still being configured"));

    wait_for_state(orchestrator, OrchestratorState::DemoReady).await;
    assert!(orchestrator.processing_status().await.contains("ready"));
}
