//! Volatility and market correlation from recent closes

use super::{ensure_range, IntoVote};
use crate::models::{AgentVote, VolatilityJudgment};
use crate::Result;
use tracing::debug;

pub const DEFAULT_VOLATILITY: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct VolatilityInput {
    pub company_name: String,
    pub historical_prices: Vec<f64>,
    pub esg_score: f64,
}

pub fn analyze_volatility(input: &VolatilityInput) -> Result<VolatilityJudgment> {
    let esg = ensure_range("esg_score", input.esg_score, 0.0, 10.0)?;
    let prices: Vec<f64> = input
        .historical_prices
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .collect();

    let predicted_volatility = coefficient_of_variation(&prices).unwrap_or(DEFAULT_VOLATILITY);
    let market_correlation = 0.5 + (esg / 10.0) * 0.3;

    let mut insights = Vec::new();
    if predicted_volatility > 0.25 {
        insights.push("High volatility detected - increased risk".to_string());
    } else if predicted_volatility < 0.10 {
        insights.push("Low volatility - stable investment".to_string());
    } else {
        insights.push("Moderate volatility - normal market behavior".to_string());
    }

    if esg >= 7.0 {
        insights.push("Strong ESG fundamentals suggest long-term stability".to_string());
    } else if esg <= 4.0 {
        insights.push("Weak ESG metrics may increase future volatility".to_string());
    }

    if market_correlation > 0.7 {
        insights.push("High market correlation - follows broader trends".to_string());
    }

    let confidence = match prices.len() {
        n if n > 30 => 0.85,
        n if n < 10 => 0.55,
        _ => 0.70,
    };

    debug!(
        company = %input.company_name,
        samples = prices.len(),
        volatility = predicted_volatility,
        "Volatility analyzed"
    );

    Ok(VolatilityJudgment {
        predicted_volatility,
        market_correlation,
        insights,
        confidence,
    })
}

/// Sample standard deviation over the mean. `None` with fewer than two
/// samples or a non-positive mean.
fn coefficient_of_variation(prices: &[f64]) -> Option<f64> {
    if prices.len() < 2 {
        return None;
    }

    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }

    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() / mean)
}

impl IntoVote for VolatilityJudgment {
    fn agent_name(&self) -> &'static str {
        "volatility"
    }

    fn to_vote(&self) -> AgentVote {
        let decision = if self.predicted_volatility > 0.25 {
            "HIGH_VOLATILITY"
        } else if self.predicted_volatility < 0.10 {
            "LOW_VOLATILITY"
        } else {
            "MODERATE_VOLATILITY"
        };

        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: decision.to_string(),
            confidence: self.confidence,
            reasoning: self.insights.join("; "),
        }
    }
}
