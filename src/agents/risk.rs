//! Investment risk assessment

use super::{clamp, ensure_finite, ensure_range, IntoVote};
use crate::models::{AgentVote, RiskAction, RiskJudgment, RiskLevel};
use crate::Result;
use tracing::debug;

const ESG_WEIGHT: f64 = 5.0;
const SENTIMENT_WEIGHT: f64 = 40.0;
const VOLATILITY_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct RiskInput {
    pub company_name: String,
    pub esg_score: f64,
    pub news_sentiment: f64,
    pub volatility: f64,
}

/// Score in [0,100], lower is safer.
pub fn assess_risk(input: &RiskInput) -> Result<RiskJudgment> {
    let esg = ensure_range("esg_score", input.esg_score, 0.0, 10.0)?;
    let sentiment = ensure_range("news_sentiment", input.news_sentiment, 0.0, 1.0)?;
    let volatility = ensure_finite("volatility", input.volatility)?;

    let score = clamp(
        (10.0 - esg) * ESG_WEIGHT
            + (1.0 - sentiment) * SENTIMENT_WEIGHT
            + clamp(volatility, 0.0, 1.0) * VOLATILITY_WEIGHT,
        0.0,
        100.0,
    );

    let (level, action) = classify(score);
    let mut reasons = Vec::new();

    match level {
        RiskLevel::Critical => reasons.push("Critical risk level detected".to_string()),
        RiskLevel::High => reasons.push("High risk level".to_string()),
        RiskLevel::Medium => reasons.push("Moderate risk requires review".to_string()),
        RiskLevel::Low => {}
    }

    if esg < 4.0 {
        reasons.push(format!(
            "Low ESG score ({:.1}/10) indicates sustainability risks",
            esg
        ));
    } else if esg >= 7.0 {
        reasons.push(format!("Strong ESG score ({:.1}/10)", esg));
    } else {
        reasons.push(format!("Moderate ESG score ({:.1}/10)", esg));
    }

    if sentiment < 0.4 {
        reasons.push("Negative news sentiment detected".to_string());
    } else if sentiment >= 0.6 {
        reasons.push("Positive news sentiment".to_string());
    } else {
        reasons.push("Neutral news sentiment".to_string());
    }

    if volatility > 0.5 {
        reasons.push("High stock volatility indicates market uncertainty".to_string());
    }

    if esg < 3.0 {
        reasons.push("High regulatory compliance risk".to_string());
    }

    debug!(
        company = %input.company_name,
        score = score,
        level = %level,
        action = %action,
        "Risk assessed"
    );

    Ok(RiskJudgment {
        action,
        level,
        score,
        reasons,
    })
}

/// Thresholds: 70 critical, 50 high, 30 medium.
pub fn classify(score: f64) -> (RiskLevel, RiskAction) {
    if score >= 70.0 {
        (RiskLevel::Critical, RiskAction::Reject)
    } else if score >= 50.0 {
        (RiskLevel::High, RiskAction::Reject)
    } else if score >= 30.0 {
        (RiskLevel::Medium, RiskAction::Review)
    } else {
        (RiskLevel::Low, RiskAction::Approve)
    }
}

impl IntoVote for RiskJudgment {
    fn agent_name(&self) -> &'static str {
        "risk_assessment"
    }

    fn to_vote(&self) -> AgentVote {
        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: self.action.to_string(),
            confidence: clamp(1.0 - self.score / 100.0, 0.0, 1.0),
            reasoning: format!("{} risk ({:.1}/100)", self.level, self.score),
        }
    }
}
