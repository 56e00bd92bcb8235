/*!
Connectivity diagnostics over a caller-supplied candidate list.

## Round lifecycle

`idle -> testing -> settled`. [`DiagnosticsController::run_all`] allocates a
fresh [`RoundId`], replaces the board with every candidate in `testing` before
the first await, probes all candidates concurrently, and writes the settled
rows back in one step once every probe has finished.

## Selection policy

The first reachable candidate in declaration order is promoted into the
[`EndpointStore`]. Latency plays no part in the choice. When nothing is
reachable the store is left as it was.

## Stale rounds

Results are applied only while the board still belongs to the round that
produced them. A round overtaken by a newer `run_all` reports
[`RoundOutcome::Superseded`], leaves the board alone and promotes nothing.

The board mutex is never held across an await point.
*/

use crate::core::endpoint::debug_logger::get_debug_logger;
use crate::core::endpoint::health::probe::HealthProbe;
use crate::core::endpoint::store::EndpointStore;
use crate::core::endpoint::types::*;
use futures::future::join_all;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared per-row state rendered by the diagnostics screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsBoard {
    pub round: Option<RoundId>,
    pub phase: RoundPhase,
    pub candidates: Vec<Candidate>,
}

pub struct DiagnosticsController {
    probe: HealthProbe,
    store: Arc<dyn EndpointStore>,
    timeout_ms: u32,
    board: Mutex<DiagnosticsBoard>,
    last_round: AtomicU64,
}

impl DiagnosticsController {
    pub fn new(probe: HealthProbe, store: Arc<dyn EndpointStore>, timeout_ms: u32) -> Self {
        Self {
            probe,
            store,
            timeout_ms,
            board: Mutex::new(DiagnosticsBoard::default()),
            last_round: AtomicU64::new(0),
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Copy of the board as the UI would render it right now
    pub fn snapshot(&self) -> DiagnosticsBoard {
        self.board().clone()
    }

    /// True while a round is in flight; the UI disables re-triggering
    pub fn is_busy(&self) -> bool {
        self.board().phase == RoundPhase::Testing
    }

    /// Probe every candidate concurrently and promote the first reachable one
    ///
    /// Always returns exactly one settled [`Candidate`] per input URL, in input
    /// order. Unparseable URLs settle as `failed` without network I/O.
    pub async fn run_all(&self, urls: &[String]) -> RoundReport {
        let debug_logger = get_debug_logger();
        let round = RoundId(self.last_round.fetch_add(1, Ordering::SeqCst) + 1);

        {
            let mut board = self.board();
            board.round = Some(round);
            board.phase = RoundPhase::Testing;
            board.candidates = urls.iter().map(Candidate::testing).collect();
        }
        debug_logger.round_start(&round.to_string(), urls.len());

        let settled: Vec<Candidate> = join_all(urls.iter().map(|url| self.settle(url))).await;

        let still_current = {
            let mut board = self.board();
            if board.round == Some(round) {
                board.candidates = settled.clone();
                board.phase = RoundPhase::Settled;
                true
            } else {
                false
            }
        };

        if !still_current {
            let current = self.board().round.map(|r| r.to_string());
            debug_logger.round_superseded(&round.to_string(), current.as_deref());
            return RoundReport {
                round,
                candidates: settled,
                outcome: RoundOutcome::Superseded,
            };
        }

        let outcome = self.promote_first_reachable(&settled);

        let succeeded = settled.iter().filter(|c| c.is_success()).count();
        debug_logger.round_settled(
            &round.to_string(),
            succeeded,
            settled.len() - succeeded,
            outcome_code(&outcome),
        );

        RoundReport {
            round,
            candidates: settled,
            outcome,
        }
    }

    /// Re-probe a single row of the current round; never promotes
    ///
    /// If the URL is on the board its row goes to `testing` and receives the
    /// result, unless a new round started meanwhile.
    pub async fn run_one(&self, url: &str) -> Candidate {
        let round = {
            let mut board = self.board();
            if let Some(row) = board.candidates.iter_mut().find(|c| c.url == url) {
                row.mark_testing();
            }
            board.round
        };

        let candidate = self.settle(url).await;

        let mut board = self.board();
        if board.round == round {
            if let Some(row) = board.candidates.iter_mut().find(|c| c.url == url) {
                *row = candidate.clone();
            }
        } else {
            let current = board.round.map(|r| r.to_string());
            drop(board);
            get_debug_logger().round_superseded(
                &round.map(|r| r.to_string()).unwrap_or_else(|| "none".to_string()),
                current.as_deref(),
            );
        }

        candidate
    }

    async fn settle(&self, url: &str) -> Candidate {
        match Endpoint::parse(url) {
            Ok(endpoint) => {
                let report = self.probe.probe(&endpoint, self.timeout_ms).await;
                Candidate::from_report(url, report)
            }
            Err(e) => Candidate::rejected(url, ProbeFailure::InvalidEndpoint(e.to_string())),
        }
    }

    fn promote_first_reachable(&self, settled: &[Candidate]) -> RoundOutcome {
        let Some(winner) = settled.iter().find(|c| c.is_success()) else {
            return RoundOutcome::NoneReachable;
        };

        match self.store.set(&winner.url) {
            Ok(endpoint) => RoundOutcome::Promoted { endpoint },
            Err(e) => {
                get_debug_logger().error_sync(
                    "DiagnosticsController",
                    "promotion_failed",
                    &format!("Could not persist {}: {}", winner.url, e),
                );
                RoundOutcome::PersistFailed {
                    url: winner.url.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn board(&self) -> MutexGuard<'_, DiagnosticsBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn outcome_code(outcome: &RoundOutcome) -> &'static str {
    match outcome {
        RoundOutcome::Promoted { .. } => "promoted",
        RoundOutcome::NoneReachable => "none_reachable",
        RoundOutcome::Superseded => "superseded",
        RoundOutcome::PersistFailed { .. } => "persist_failed",
    }
}
