//! Consensus across agent votes
//!
//! Confidence-weighted plurality: each vote adds its (clamped) confidence to
//! its decision's tally. A winner holding less than half of the total weight
//! is reported as `NO_CONSENSUS`.

use crate::models::{AgentVote, ConsensusResult};
use tracing::debug;

pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const NO_CONSENSUS: &str = "NO_CONSENSUS";

const MAJORITY: f64 = 0.5;

pub fn reach_consensus(votes: &[AgentVote]) -> ConsensusResult {
    if votes.is_empty() {
        return ConsensusResult {
            final_decision: INSUFFICIENT_DATA.to_string(),
            confidence: 0.0,
            supporting_agents: Vec::new(),
            dissenting_agents: Vec::new(),
        };
    }

    // Insertion-ordered tally so ties go to the first decision seen.
    let mut tally: Vec<(&str, f64)> = Vec::new();
    for vote in votes {
        let weight = if vote.confidence.is_finite() {
            vote.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match tally.iter_mut().find(|(d, _)| *d == vote.decision) {
            Some((_, sum)) => *sum += weight,
            None => tally.push((vote.decision.as_str(), weight)),
        }
    }

    let total: f64 = tally.iter().map(|(_, w)| w).sum();
    let (winner, winner_weight) = tally
        .iter()
        .fold(tally[0], |best, &entry| if entry.1 > best.1 { entry } else { best });

    let confidence = if total > 0.0 {
        winner_weight / total
    } else {
        0.0
    };

    let (supporting, dissenting): (Vec<&AgentVote>, Vec<&AgentVote>) =
        votes.iter().partition(|v| v.decision == winner);

    let final_decision = if confidence < MAJORITY {
        NO_CONSENSUS.to_string()
    } else {
        winner.to_string()
    };

    debug!(
        votes = votes.len(),
        winner = %winner,
        decision = %final_decision,
        confidence = confidence,
        "Consensus reached"
    );

    ConsensusResult {
        final_decision,
        confidence,
        supporting_agents: supporting.iter().map(|v| v.agent_name.clone()).collect(),
        dissenting_agents: dissenting.iter().map(|v| v.agent_name.clone()).collect(),
    }
}
