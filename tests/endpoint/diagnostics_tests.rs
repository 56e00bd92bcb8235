/*!
Tests for diagnostics rounds.

Covers concurrent fan-out, the declaration-order selection policy, store
promotion, stale-round suppression and single-row retests.
*/

use crate::common::MockHealthClient;
use apiscout::core::endpoint::health::HealthProbe;
use apiscout::core::endpoint::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

fn controller(client: MockHealthClient, store: Arc<MemoryEndpointStore>, timeout_ms: u32) -> DiagnosticsController {
    DiagnosticsController::new(HealthProbe::new(client.into_arc()), store, timeout_ms)
}

#[tokio::test]
async fn test_end_to_end_timeout_then_localhost() {
    let client = MockHealthClient::new()
        .hang("http://192.168.1.50:8000/health")
        .respond("http://localhost:8000/health", 200, 10);
    let store = Arc::new(MemoryEndpointStore::new());
    let controller = controller(client, Arc::clone(&store), 200);

    let report = controller
        .run_all(&urls(&["http://192.168.1.50:8000", "http://localhost:8000"]))
        .await;

    assert_eq!(store.get(), Some(Endpoint::parse("http://localhost:8000").unwrap()));
    assert_eq!(report.promoted().map(Endpoint::as_str), Some("http://localhost:8000"));

    assert_eq!(report.candidates[0].state, CandidateState::Failed);
    assert_eq!(report.candidates[0].reason, Some(ProbeFailure::Timeout));
    assert_eq!(report.candidates[1].state, CandidateState::Success);
    assert!(report.candidates[1].latency_ms.unwrap() < 200);
}

#[tokio::test]
async fn test_run_all_returns_one_settled_result_per_candidate() {
    let client = MockHealthClient::new()
        .respond("http://a.lan:8000/health", 200, 5)
        .respond("http://b.lan:8000/health", 500, 5)
        .hang("http://c.lan:8000/health");
    let controller = controller(client, Arc::new(MemoryEndpointStore::new()), 100);

    let input = urls(&[
        "http://a.lan:8000",
        "http://b.lan:8000",
        "http://c.lan:8000",
        "http://d.lan:8000",
        "not a url",
    ]);
    let report = controller.run_all(&input).await;

    assert_eq!(report.candidates.len(), input.len());
    for (candidate, url) in report.candidates.iter().zip(&input) {
        assert_eq!(&candidate.url, url);
        assert!(candidate.is_settled(), "{} left in {:?}", url, candidate.state);
    }
    assert!(matches!(
        report.candidates[4].reason,
        Some(ProbeFailure::InvalidEndpoint(_))
    ));

    let board = controller.snapshot();
    assert_eq!(board.phase, RoundPhase::Settled);
    assert_eq!(board.candidates, report.candidates);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_probes_run_concurrently() {
    let client = MockHealthClient::new()
        .respond("http://a.lan:8000/health", 200, 150)
        .respond("http://b.lan:8000/health", 200, 150)
        .respond("http://c.lan:8000/health", 200, 150);
    let controller = controller(client, Arc::new(MemoryEndpointStore::new()), 1_000);

    let start = Instant::now();
    controller
        .run_all(&urls(&["http://a.lan:8000", "http://b.lan:8000", "http://c.lan:8000"]))
        .await;

    // sequential probing would need at least 450ms
    assert!(start.elapsed() < Duration::from_millis(400));
}

#[tokio::test]
async fn test_selection_follows_declaration_order_not_latency() {
    // B is slow, C is fast; B must still win
    let client = MockHealthClient::new()
        .respond("http://b.lan:8000/health", 200, 120)
        .respond("http://c.lan:8000/health", 200, 5);
    let store = Arc::new(MemoryEndpointStore::new());
    let controller = controller(client, Arc::clone(&store), 1_000);

    let report = controller
        .run_all(&urls(&["http://a.lan:8000", "http://b.lan:8000", "http://c.lan:8000"]))
        .await;

    assert_eq!(report.candidates[0].state, CandidateState::Failed);
    assert_eq!(
        report.outcome,
        RoundOutcome::Promoted {
            endpoint: Endpoint::parse("http://b.lan:8000").unwrap()
        }
    );
    assert_eq!(store.get(), Some(Endpoint::parse("http://b.lan:8000").unwrap()));
}

#[tokio::test]
async fn test_no_reachable_candidate_keeps_previous_override() {
    let previous = Endpoint::parse("http://192.168.1.10:8000").unwrap();
    let store = Arc::new(MemoryEndpointStore::with_value(previous.clone()));
    let client = MockHealthClient::new().respond("http://a.lan:8000/health", 503, 0);
    let controller = controller(client, Arc::clone(&store), 100);

    let report = controller
        .run_all(&urls(&["http://a.lan:8000", "http://b.lan:8000"]))
        .await;

    assert_eq!(report.outcome, RoundOutcome::NoneReachable);
    assert!(report.all_failed());
    assert_eq!(store.get(), Some(previous));
}

#[tokio::test]
async fn test_empty_candidate_list_settles() {
    let store = Arc::new(MemoryEndpointStore::new());
    let controller = controller(MockHealthClient::new(), Arc::clone(&store), 100);

    let report = controller.run_all(&[]).await;

    assert!(report.candidates.is_empty());
    assert_eq!(report.outcome, RoundOutcome::NoneReachable);
    assert_eq!(controller.snapshot().phase, RoundPhase::Settled);
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_all_rows_testing_before_any_result() {
    let client = MockHealthClient::new()
        .respond("http://a.lan:8000/health", 200, 5)
        .respond("http://b.lan:8000/health", 200, 150);
    let controller = controller(client, Arc::new(MemoryEndpointStore::new()), 1_000);
    let input = urls(&["http://a.lan:8000", "http://b.lan:8000"]);

    let observe = async {
        // a.lan has settled by now, b.lan has not
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.snapshot()
    };
    let (report, mid_round) = tokio::join!(controller.run_all(&input), observe);

    assert_eq!(mid_round.phase, RoundPhase::Testing);
    assert!(mid_round
        .candidates
        .iter()
        .all(|c| c.state == CandidateState::Testing));
    assert_eq!(mid_round.round, Some(report.round));
}

#[tokio::test]
async fn test_stale_round_results_are_discarded() {
    let client = MockHealthClient::new()
        .respond("http://slow.lan:8000/health", 200, 200)
        .respond("http://fast.lan:8000/health", 200, 5);
    let store = Arc::new(MemoryEndpointStore::new());
    let controller = controller(client, Arc::clone(&store), 1_000);

    let first_input = urls(&["http://slow.lan:8000"]);
    let second_input = urls(&["http://b.lan:8000", "http://fast.lan:8000"]);

    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let report = controller.run_all(&second_input).await;
        (report, controller.snapshot())
    };
    let (first, (second, board_after_second)) = tokio::join!(controller.run_all(&first_input), second);

    assert!(first.round < second.round);
    assert_eq!(first.outcome, RoundOutcome::Superseded);
    assert_eq!(first.candidates[0].state, CandidateState::Success);

    // the late first round changed neither the board nor the store
    let board = controller.snapshot();
    assert_eq!(board, board_after_second);
    assert_eq!(board.round, Some(second.round));
    assert_eq!(board.candidates, second.candidates);
    assert_eq!(board.candidates[0].url, "http://b.lan:8000");
    assert_eq!(board.candidates[0].state, CandidateState::Failed);
    assert_eq!(store.get(), Some(Endpoint::parse("http://fast.lan:8000").unwrap()));
}

#[tokio::test]
async fn test_run_one_updates_single_row_without_promoting() {
    let client = MockHealthClient::new().respond("http://b.lan:8000/health", 200, 5);
    let store = Arc::new(MemoryEndpointStore::new());
    let controller = controller(client, Arc::clone(&store), 100);

    controller
        .run_all(&urls(&["http://a.lan:8000", "http://b.lan:8000"]))
        .await;
    store.clear().unwrap();

    let retested = controller.run_one("http://b.lan:8000").await;
    assert_eq!(retested.state, CandidateState::Success);

    let board = controller.snapshot();
    assert_eq!(board.candidates[1], retested);
    assert_eq!(board.candidates[0].state, CandidateState::Failed);
    assert!(store.get().is_none(), "run_one must not promote");
}

#[tokio::test]
async fn test_run_one_marks_row_testing_while_in_flight() {
    let client = MockHealthClient::new().respond("http://a.lan:8000/health", 200, 100);
    let controller = controller(client, Arc::new(MemoryEndpointStore::new()), 1_000);
    controller.run_all(&urls(&["http://a.lan:8000", "http://b.lan:8000"])).await;

    let observe = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        controller.snapshot()
    };
    let (_, mid) = tokio::join!(controller.run_one("http://a.lan:8000"), observe);

    assert_eq!(mid.candidates[0].state, CandidateState::Testing);
    assert_eq!(mid.candidates[1].state, CandidateState::Failed);
}

#[tokio::test]
async fn test_run_one_for_unknown_url_leaves_board_alone() {
    let client = MockHealthClient::new().respond("http://x.lan:8000/health", 200, 0);
    let controller = controller(client, Arc::new(MemoryEndpointStore::new()), 100);
    controller.run_all(&urls(&["http://a.lan:8000"])).await;
    let before = controller.snapshot();

    let candidate = controller.run_one("http://x.lan:8000").await;

    assert_eq!(candidate.state, CandidateState::Success);
    assert_eq!(controller.snapshot(), before);
}

/// Store that holds a value but refuses every write
struct ReadOnlyStore {
    inner: MemoryEndpointStore,
}

impl EndpointStore for ReadOnlyStore {
    fn get(&self) -> Option<Endpoint> {
        self.inner.get()
    }

    fn set(&self, _raw: &str) -> Result<Endpoint, StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_persist_failure_reports_outcome_and_keeps_store() {
    let previous = Endpoint::parse("http://10.0.2.2:8000").unwrap();
    let store = Arc::new(ReadOnlyStore {
        inner: MemoryEndpointStore::with_value(previous.clone()),
    });
    let client = MockHealthClient::new().respond("http://localhost:8000/health", 200, 5);
    let controller = DiagnosticsController::new(
        HealthProbe::new(client.into_arc()),
        Arc::clone(&store) as Arc<dyn EndpointStore>,
        100,
    );

    let report = controller
        .run_all(&urls(&["http://a.lan:8000", "http://localhost:8000"]))
        .await;

    match &report.outcome {
        RoundOutcome::PersistFailed { url, reason } => {
            assert_eq!(url, "http://localhost:8000");
            assert!(reason.contains("read-only filesystem"), "{}", reason);
        }
        other => panic!("expected PersistFailed, got {:?}", other),
    }
    assert!(report.promoted().is_none());

    let board = controller.snapshot();
    assert_eq!(board.phase, RoundPhase::Settled);
    assert_eq!(board.candidates[1].state, CandidateState::Success);
    assert!(!controller.is_busy());
    assert_eq!(store.get(), Some(previous));
}

#[tokio::test]
async fn test_run_one_on_fresh_controller_only_reports() {
    let client = MockHealthClient::new().respond("http://localhost:8000/health", 200, 0);
    let store = Arc::new(MemoryEndpointStore::new());
    let controller = controller(client, Arc::clone(&store), 100);

    let reachable = controller.run_one("http://localhost:8000").await;
    assert_eq!(reachable.state, CandidateState::Success);

    let rejected = controller.run_one("http://localhost:8000/#frag").await;
    assert_eq!(rejected.state, CandidateState::Failed);
    assert!(matches!(rejected.reason, Some(ProbeFailure::InvalidEndpoint(_))));

    assert_eq!(controller.snapshot(), DiagnosticsBoard::default());
    assert!(store.get().is_none());
}
