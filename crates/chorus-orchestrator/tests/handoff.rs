mod common;

use chorus_core::persona::CREATOR_NAME;
use chorus_core::ChorusError;
use chorus_orchestrator::OrchestratorState;
use common::*;

async fn reach_demo_ready(h: &Harness) {
    h.orchestrator.begin().await.unwrap();
    gather_and_confirm(&h.orchestrator).await;
    h.orchestrator.finalize_requirements().await.unwrap();
    wait_for_state(&h.orchestrator, OrchestratorState::DemoReady).await;
}

#[tokio::test(start_paused = true)]
async fn racing_demo_starts_yield_one_handoff() {
    let h = harness();
    reach_demo_ready(&h).await;

    let (first, second) = tokio::join!(
        h.orchestrator.start_demo(),
        h.orchestrator.start_demo(),
    );
    let errors = [first, second]
        .into_iter()
        .filter_map(|r| r.err())
        .collect::<Vec<_>>();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ChorusError::NotReady));

    wait_for_state(&h.orchestrator, OrchestratorState::DemoActive).await;
    // One creator start, exactly one demo start.
    assert_eq!(h.session.started_voices(), vec!["marin", "echo"]);
    assert_eq!(h.session.stop_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn start_demo_before_ready_is_refused() {
    let h = harness();
    h.orchestrator.begin().await.unwrap();

    let err = h.orchestrator.start_demo().await.unwrap_err();
    assert!(matches!(err, ChorusError::NotReady));
    assert!(err.advisory().contains("isn't quite ready"));
}

#[tokio::test(start_paused = true)]
async fn failed_demo_start_restores_the_creator() {
    let h = harness();
    reach_demo_ready(&h).await;

    h.session.fail_next_start();
    h.orchestrator.start_demo().await.unwrap();
    wait_for_state(&h.orchestrator, OrchestratorState::Gathering).await;

    // The old creator session was retired, a fresh one took its place.
    assert_eq!(h.session.started_voices(), vec!["marin", "marin"]);
    assert!(h
        .session
        .spoken()
        .iter()
        .any(|s| s.contains("trouble connecting")));

    // A retry needs a fresh confirm/finalize round.
    let err = h.orchestrator.start_demo().await.unwrap_err();
    assert!(matches!(err, ChorusError::NotReady));
}

#[tokio::test(start_paused = true)]
async fn feedback_loop_returns_to_creator_and_back() {
    let synthesizer = InstantSynthesizer::new();
    let h = harness_with(synthesizer.clone());
    reach_demo_ready(&h).await;

    h.orchestrator.start_demo().await.unwrap();
    wait_for_state(&h.orchestrator, OrchestratorState::DemoActive).await;

    h.orchestrator.handoff_back().await.unwrap();
    wait_for_state(&h.orchestrator, OrchestratorState::Gathering).await;

    let spoken = h.session.spoken();
    assert!(spoken.iter().any(|s| s.contains("How did the demo")));
    assert!(spoken.iter().any(|s| s.contains(CREATOR_NAME)));

    // Adjustments are allowed again, and the demo can be revisited directly.
    h.orchestrator
        .store_requirement("tone", "very formal")
        .await
        .unwrap();
    h.orchestrator.try_demo_again().await.unwrap();
    wait_for_state(&h.orchestrator, OrchestratorState::DemoActive).await;

    assert_eq!(
        h.session.started_voices(),
        vec!["marin", "echo", "marin", "echo"]
    );
    // Every retired session was stopped exactly once.
    assert_eq!(h.session.stop_count(), 3);
    // The retry reused the stored spec; no second synthesis ran.
    assert_eq!(synthesizer.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_during_a_handoff_stays_terminal() {
    let h = harness();
    reach_demo_ready(&h).await;

    h.orchestrator.start_demo().await.unwrap();
    // Close while the outgoing farewell grace is still running.
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    h.orchestrator.close_session(None).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    assert_eq!(h.orchestrator.state().await, OrchestratorState::Completed);
    // Both the retired creator session and the orphaned demo session stop.
    assert_eq!(h.session.stop_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn handoff_back_requires_an_active_demo() {
    let h = harness();
    h.orchestrator.begin().await.unwrap();

    let err = h.orchestrator.handoff_back().await.unwrap_err();
    assert!(matches!(err, ChorusError::NotReady));
}

#[tokio::test(start_paused = true)]
async fn demo_sessions_carry_the_synthesized_instructions() {
    let h = harness();
    reach_demo_ready(&h).await;
    let spec = h.orchestrator.current_spec().await.unwrap();

    h.orchestrator.start_demo().await.unwrap();
    wait_for_state(&h.orchestrator, OrchestratorState::DemoActive).await;

    let starts = h.session.starts.lock().unwrap();
    let (instructions, voice) = &starts[1];
    assert_eq!(instructions, &spec.instructions);
    assert_eq!(voice, &spec.voice);
    assert!(instructions.contains("Tony's Pizza"));
}
