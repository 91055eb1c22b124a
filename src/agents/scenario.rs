//! Digital-twin scenario simulation

use super::{ensure_finite, ensure_range, IntoVote};
use crate::models::{AgentVote, ScenarioJudgment};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Impact factor used for the per-analysis stress suite.
pub const STRESS_IMPACT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    CarbonTax,
    RegulationChange,
    MarketShift,
    SupplyChainDisruption,
    Unknown(String),
}

impl ScenarioKind {
    pub const REGISTERED: [ScenarioKind; 4] = [
        ScenarioKind::CarbonTax,
        ScenarioKind::RegulationChange,
        ScenarioKind::MarketShift,
        ScenarioKind::SupplyChainDisruption,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "CARBON_TAX" => ScenarioKind::CarbonTax,
            "REGULATION_CHANGE" => ScenarioKind::RegulationChange,
            "MARKET_SHIFT" => ScenarioKind::MarketShift,
            "SUPPLY_CHAIN_DISRUPTION" => ScenarioKind::SupplyChainDisruption,
            _ => ScenarioKind::Unknown(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScenarioKind::CarbonTax => "CARBON_TAX",
            ScenarioKind::RegulationChange => "REGULATION_CHANGE",
            ScenarioKind::MarketShift => "MARKET_SHIFT",
            ScenarioKind::SupplyChainDisruption => "SUPPLY_CHAIN_DISRUPTION",
            ScenarioKind::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a company used to simulate external shocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalTwin {
    pub twin_id: String,
    pub company: String,
    pub esg_score: f64,
    /// Last traded price stands in when shares outstanding are unknown.
    pub market_cap: f64,
    pub industry: String,
    pub created_at: DateTime<Utc>,
}

impl DigitalTwin {
    pub fn new(
        company: &str,
        esg_score: f64,
        market_cap: f64,
        industry: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let esg_score = ensure_range("esg_score", esg_score, 0.0, 10.0)?;
        let market_cap = ensure_finite("market_cap", market_cap)?;

        Ok(Self {
            twin_id: twin_id(company, esg_score, created_at),
            company: company.to_string(),
            esg_score,
            market_cap,
            industry: industry.to_string(),
            created_at,
        })
    }

    /// Runs every registered scenario at the stress impact.
    pub fn stress_suite(&self) -> Result<Vec<ScenarioJudgment>> {
        ScenarioKind::REGISTERED
            .iter()
            .map(|kind| simulate_scenario(self, kind, STRESS_IMPACT))
            .collect()
    }
}

/// First 8 bytes of SHA-256 over `company:esg:unix_seconds`, hex encoded.
fn twin_id(company: &str, esg_score: f64, created_at: DateTime<Utc>) -> String {
    let data = format!("{}:{:.6}:{}", company, esg_score, created_at.timestamp());
    let digest = Sha256::digest(data.as_bytes());
    hex::encode(&digest[..8])
}

/// Unknown scenario tags yield zero deltas rather than an error.
pub fn simulate_scenario(
    twin: &DigitalTwin,
    kind: &ScenarioKind,
    impact: f64,
) -> Result<ScenarioJudgment> {
    let k = ensure_finite("impact_factor", impact)?;

    let (esg_delta, value_delta, recommendations): (f64, f64, &[&str]) = match kind {
        ScenarioKind::CarbonTax => (
            -0.5 * k,
            -2.0 * k,
            &[
                "Invest in carbon reduction technologies",
                "Explore carbon offset programs",
                "Transition to renewable energy sources",
            ],
        ),
        ScenarioKind::RegulationChange if twin.esg_score < 5.0 => (
            -1.0 * k,
            -3.0 * k,
            &[
                "Urgent: Improve ESG compliance",
                "Hire ESG compliance officer",
                "Implement sustainability reporting systems",
            ],
        ),
        ScenarioKind::RegulationChange => (
            0.3 * k,
            1.5 * k,
            &[
                "Leverage strong ESG position for competitive advantage",
                "Market ESG leadership to investors",
            ],
        ),
        ScenarioKind::MarketShift if twin.esg_score >= 7.0 => (
            0.2 * k,
            5.0 * k,
            &["Capitalize on ESG premium", "Expand green product lines"],
        ),
        ScenarioKind::MarketShift => (
            -0.3 * k,
            -4.0 * k,
            &[
                "Accelerate ESG improvements",
                "Risk of losing market share to ESG leaders",
            ],
        ),
        ScenarioKind::SupplyChainDisruption => (
            -0.4 * k,
            -2.5 * k,
            &[
                "Diversify supply chain",
                "Implement supply chain ESG audits",
                "Build resilience through local sourcing",
            ],
        ),
        ScenarioKind::Unknown(_) => (0.0, 0.0, &["Unknown scenario type"]),
    };

    debug!(
        twin_id = %twin.twin_id,
        scenario = %kind,
        esg_delta = esg_delta,
        value_delta = value_delta,
        "Scenario simulated"
    );

    Ok(ScenarioJudgment {
        scenario: kind.to_string(),
        esg_delta,
        value_delta,
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    })
}

impl IntoVote for ScenarioJudgment {
    fn agent_name(&self) -> &'static str {
        "digital_twin"
    }

    fn to_vote(&self) -> AgentVote {
        let known = ScenarioKind::REGISTERED
            .iter()
            .any(|k| k.as_str() == self.scenario);
        let decision = if self.value_delta >= 0.0 {
            "RESILIENT"
        } else {
            "EXPOSED"
        };

        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: decision.to_string(),
            confidence: if known { 0.6 } else { 0.0 },
            reasoning: format!(
                "{}: ESG {:+.1}, value {:+.1}%",
                self.scenario, self.esg_delta, self.value_delta
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn twin(esg: f64) -> DigitalTwin {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        DigitalTwin::new("Acme", esg, 100.0, "technology", at).unwrap()
    }

    #[test]
    fn test_twin_id_is_deterministic() {
        let a = twin(6.0);
        let b = twin(6.0);
        assert_eq!(a.twin_id, b.twin_id);
        assert_eq!(a.twin_id.len(), 16);
        assert_ne!(a.twin_id, twin(6.5).twin_id);
    }

    #[test]
    fn test_esg_dependent_scenarios() {
        let weak = twin(3.0);
        let r = simulate_scenario(&weak, &ScenarioKind::RegulationChange, 2.0).unwrap();
        assert_eq!((r.esg_delta, r.value_delta), (-2.0, -6.0));

        let strong = twin(8.0);
        let r = simulate_scenario(&strong, &ScenarioKind::MarketShift, 1.0).unwrap();
        assert_eq!((r.esg_delta, r.value_delta), (0.2, 5.0));
        assert_eq!(r.to_vote().decision, "RESILIENT");
    }

    #[test]
    fn test_unknown_scenario_has_zero_deltas() {
        let kind = ScenarioKind::parse("ALIEN_INVASION");
        assert_eq!(kind, ScenarioKind::Unknown("ALIEN_INVASION".to_string()));

        let r = simulate_scenario(&twin(5.0), &kind, 3.0).unwrap();
        assert_eq!(r.esg_delta, 0.0);
        assert_eq!(r.value_delta, 0.0);
        assert_eq!(r.recommendations, vec!["Unknown scenario type".to_string()]);
        assert_eq!(r.to_vote().confidence, 0.0);
    }

    #[test]
    fn test_stress_suite_runs_all_registered() {
        let results = twin(5.0).stress_suite().unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.scenario.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "CARBON_TAX",
                "REGULATION_CHANGE",
                "MARKET_SHIFT",
                "SUPPLY_CHAIN_DISRUPTION"
            ]
        );
        assert_eq!(ScenarioKind::parse("carbon_tax"), ScenarioKind::CarbonTax);
    }

    #[test]
    fn test_rejects_non_finite_impact() {
        assert!(simulate_scenario(&twin(5.0), &ScenarioKind::CarbonTax, f64::NAN).is_err());
    }
}
