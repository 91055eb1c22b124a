//! ESG-weighted portfolio allocation

use super::{clamp, ensure_finite, ensure_range};
use crate::models::PortfolioAllocation;
use crate::Result;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PortfolioCandidate {
    pub company_name: String,
    pub esg_score: f64,
    /// Percent, e.g. 15.0 for +15%.
    pub expected_return: f64,
}

/// Weights follow input order and sum to 1 for non-empty input.
///
/// `risk_tolerance` in [0,1] shifts emphasis from ESG (0) towards return (1).
pub fn optimize_portfolio(
    candidates: &[PortfolioCandidate],
    risk_tolerance: f64,
) -> Result<PortfolioAllocation> {
    let t = ensure_range("risk_tolerance", risk_tolerance, 0.0, 1.0)?;
    if candidates.is_empty() {
        return Ok(PortfolioAllocation::default());
    }

    let esg_weight = 0.8 - t * 0.4;
    let return_weight = 0.2 + t * 0.4;

    let mut composites = Vec::with_capacity(candidates.len());
    for c in candidates {
        let esg = ensure_finite("esg_score", c.esg_score)?;
        let ret = ensure_finite("expected_return", c.expected_return)?;
        let normalized_esg = esg / 10.0;
        let normalized_return = clamp((ret + 20.0) / 70.0, 0.0, 1.0);
        composites.push(normalized_esg * esg_weight + normalized_return * return_weight);
    }

    let total: f64 = composites.iter().sum();
    let weights: Vec<f64> = if total > 0.0 {
        composites.iter().map(|s| s / total).collect()
    } else {
        vec![1.0 / candidates.len() as f64; candidates.len()]
    };

    let expected_return = weighted(&weights, candidates.iter().map(|c| c.expected_return));
    let esg_score = weighted(&weights, candidates.iter().map(|c| c.esg_score));

    let variance: f64 = weights
        .iter()
        .zip(candidates)
        .map(|(w, c)| w * w * c.expected_return.abs())
        .sum();
    let portfolio_risk = variance.sqrt() * (1.0 - (esg_score / 10.0) * 0.2);

    debug!(
        companies = candidates.len(),
        risk_tolerance = t,
        expected_return = expected_return,
        portfolio_risk = portfolio_risk,
        "Portfolio optimized"
    );

    Ok(PortfolioAllocation {
        weights,
        expected_return,
        portfolio_risk,
        esg_score,
    })
}

fn weighted(weights: &[f64], values: impl Iterator<Item = f64>) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}
