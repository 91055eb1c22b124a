//! Scoring agents
//!
//! Every agent is a pure, synchronous function of its inputs: no I/O, no
//! hidden state. Errors only signal rejected inputs (non-finite numbers,
//! out-of-domain parameters); the orchestrator turns them into stage failures.

use crate::error::OrchestrationError;
use crate::models::AgentVote;
use crate::Result;

pub mod compliance;
pub mod esg;
pub mod portfolio;
pub mod profile;
pub mod regulation;
pub mod returns;
pub mod risk;
pub mod scenario;
pub mod trading;
pub mod volatility;

pub use compliance::{check_compliance, ComplianceInput};
pub use esg::{score_esg, EsgInput};
pub use portfolio::{optimize_portfolio, PortfolioCandidate};
pub use profile::CompanyProfile;
pub use regulation::{analyze_regulations, RegulationInput};
pub use returns::{analyze_returns, ReturnsInput};
pub use risk::{assess_risk, RiskInput};
pub use scenario::{simulate_scenario, DigitalTwin, ScenarioKind};
pub use trading::{generate_signal, TradingInput};
pub use volatility::{analyze_volatility, VolatilityInput};

/// Projection of a judgment into the unit the consensus stage consumes.
pub trait IntoVote {
    fn agent_name(&self) -> &'static str;
    fn to_vote(&self) -> AgentVote;
}

pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OrchestrationError::Agent(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

pub(crate) fn ensure_range(field: &str, value: f64, min: f64, max: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(OrchestrationError::Agent(format!(
            "{} must be within [{}, {}], got {}",
            field, min, max, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        assert_eq!(clamp(12.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert!(contains_any("solartech renewables", &["wind", "solar"]));
        assert!(!contains_any("acme", &["oil"]));
        assert!(ensure_finite("esg", f64::NAN).is_err());
        assert!(ensure_range("sentiment", 1.2, 0.0, 1.0).is_err());
        assert_eq!(ensure_range("sentiment", 0.4, 0.0, 1.0).unwrap(), 0.4);
    }
}
