//! Trading signal from ESG and sentiment

use super::{clamp, ensure_finite, ensure_range, IntoVote};
use crate::models::{AgentVote, TradeAction, TradingJudgment};
use crate::Result;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TradingInput {
    pub company_name: String,
    pub symbol: String,
    /// 0.0 when no price could be acquired.
    pub current_price: f64,
    pub esg_score: f64,
    pub news_sentiment: f64,
}

pub fn generate_signal(input: &TradingInput) -> Result<TradingJudgment> {
    let esg = ensure_range("esg_score", input.esg_score, 0.0, 10.0)?;
    let s = ensure_range("news_sentiment", input.news_sentiment, 0.0, 1.0)?;
    let price = ensure_range("current_price", input.current_price, 0.0, f64::MAX)?;

    let (action, pct, confidence, reasoning) = if esg >= 7.0 && s >= 0.65 {
        (
            TradeAction::Buy,
            15.0 + (esg - 7.0) * 5.0 + (s - 0.65) * 20.0,
            0.85,
            format!(
                "Strong ESG fundamentals ({:.1}/10) combined with positive market sentiment ({:.0}%) indicate growth potential",
                esg,
                s * 100.0
            ),
        )
    } else if esg >= 6.0 && s >= 0.55 {
        (
            TradeAction::Buy,
            8.0 + (esg - 6.0) * 3.0,
            0.70,
            format!(
                "Good ESG profile ({:.1}/10) with favorable sentiment suggests moderate upside",
                esg
            ),
        )
    } else if esg <= 3.5 || s <= 0.35 {
        (
            TradeAction::Sell,
            -(12.0 + (3.5 - esg) * 4.0),
            0.75,
            format!(
                "Weak ESG performance ({:.1}/10) and negative sentiment ({:.0}%) indicate downside risk",
                esg,
                s * 100.0
            ),
        )
    } else if esg <= 4.5 && s <= 0.45 {
        (
            TradeAction::Sell,
            -(5.0 + (4.5 - esg) * 2.0),
            0.60,
            "Below-average ESG metrics suggest caution".to_string(),
        )
    } else {
        (
            TradeAction::Hold,
            (esg - 5.0) * 1.5 + (s - 0.5) * 6.0,
            0.65,
            format!(
                "Balanced ESG score ({:.1}/10) with neutral sentiment suggests maintaining position",
                esg
            ),
        )
    };

    let target_price = ensure_finite("target_price", price * (1.0 + pct / 100.0))?;

    debug!(
        company = %input.company_name,
        symbol = %input.symbol,
        action = %action,
        price_change_pct = pct,
        "Trading signal generated"
    );

    Ok(TradingJudgment {
        action,
        symbol: input.symbol.clone(),
        current_price: price,
        target_price,
        price_change_pct: pct,
        confidence: clamp(confidence, 0.0, 1.0),
        reasoning,
    })
}

impl IntoVote for TradingJudgment {
    fn agent_name(&self) -> &'static str {
        "trading"
    }

    fn to_vote(&self) -> AgentVote {
        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: self.action.to_string(),
            confidence: self.confidence,
            reasoning: self.reasoning.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(esg: f64, s: f64, price: f64) -> TradingJudgment {
        generate_signal(&TradingInput {
            company_name: "Acme".to_string(),
            symbol: "ACME.NS".to_string(),
            current_price: price,
            esg_score: esg,
            news_sentiment: s,
        })
        .unwrap()
    }

    #[test]
    fn test_strong_buy() {
        let t = signal(10.0, 0.8, 100.0);
        assert_eq!(t.action, TradeAction::Buy);
        assert!((t.price_change_pct - 33.0).abs() < 1e-9);
        assert!((t.target_price - 133.0).abs() < 1e-9);
        assert_eq!(t.confidence, 0.85);
    }

    #[test]
    fn test_moderate_buy() {
        let t = signal(6.5, 0.6, 10.0);
        assert_eq!(t.action, TradeAction::Buy);
        assert!((t.price_change_pct - 9.5).abs() < 1e-9);
        assert_eq!(t.confidence, 0.70);
    }

    #[test]
    fn test_sell_rungs() {
        let t = signal(0.8, 0.3, 50.0);
        assert_eq!(t.action, TradeAction::Sell);
        assert!((t.price_change_pct + 22.8).abs() < 1e-9);
        assert_eq!(t.confidence, 0.75);

        let t = signal(4.0, 0.4, 50.0);
        assert_eq!(t.action, TradeAction::Sell);
        assert!((t.price_change_pct + 6.0).abs() < 1e-9);
        assert_eq!(t.confidence, 0.60);
    }

    #[test]
    fn test_hold_and_missing_price() {
        let t = signal(5.0, 0.5, 0.0);
        assert_eq!(t.action, TradeAction::Hold);
        assert_eq!(t.price_change_pct, 0.0);
        assert_eq!(t.target_price, 0.0);
        assert_eq!(t.to_vote().decision, "HOLD");
    }

    #[test]
    fn test_overflowing_target_price_is_rejected() {
        let result = generate_signal(&TradingInput {
            company_name: "Acme".to_string(),
            symbol: "ACME.NS".to_string(),
            current_price: f64::MAX,
            esg_score: 9.0,
            news_sentiment: 0.9,
        });
        assert!(result.is_err());
    }
}
