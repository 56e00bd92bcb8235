//! Plain-text rendering of resolution and diagnostics results for the CLI

use crate::core::endpoint::types::*;

/// Status glyph for one candidate row
pub fn state_symbol(state: CandidateState) -> &'static str {
    match state {
        CandidateState::Pending => "·",
        CandidateState::Testing => "…",
        CandidateState::Success => "✓",
        CandidateState::Failed => "✗",
    }
}

/// One row: `✓ http://localhost:8000  12ms`, or `✗ http://x:8000  timeout`
pub fn render_candidate(candidate: &Candidate) -> String {
    let detail = match (&candidate.reason, candidate.latency_ms) {
        (Some(reason), _) => reason.to_string(),
        (None, Some(ms)) => format!("{}ms", ms),
        (None, None) => String::new(),
    };

    format!(
        "{} {}  {}",
        state_symbol(candidate.state),
        candidate.url,
        detail
    )
    .trim_end()
    .to_string()
}

pub fn render_round(report: &RoundReport) -> String {
    let mut lines: Vec<String> = report.candidates.iter().map(render_candidate).collect();

    let summary = match &report.outcome {
        RoundOutcome::Promoted { endpoint } => format!("Promoted {}", endpoint),
        RoundOutcome::NoneReachable => "All candidates failed; saved endpoint unchanged".to_string(),
        RoundOutcome::Superseded => format!("{} superseded by a newer round", report.round),
        RoundOutcome::PersistFailed { url, reason } => {
            format!("{} reachable but could not be saved: {}", url, reason)
        }
    };
    lines.push(summary);
    lines.join("\n")
}

pub fn render_resolved(resolved: &ResolvedConfig) -> String {
    format!("{} ({})", resolved.endpoint, resolved.source)
}
