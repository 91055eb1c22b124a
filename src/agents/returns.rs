//! Realised period returns and compound investment projections
//!
//! Closes carry no dates, so a period is measured in trading sessions
//! counted back from the most recent close. Projections compound the mean
//! realised period return as an annual rate, or 8% when nothing was realised.

use super::{ensure_finite, ensure_range};
use crate::error::OrchestrationError;
use crate::models::{HistoricalReturn, InvestmentProjection, ReturnsJudgment};
use crate::Result;
use chrono::{Months, NaiveDate};
use tracing::debug;

pub const DEFAULT_ANNUAL_RETURN_PCT: f64 = 8.0;

const SESSIONS_PER_MONTH: usize = 21;
/// Holidays a look-back may fall short by and still count as covered.
const SESSION_SLACK: usize = 3;

const PERIODS: &[(&str, u32)] = &[
    ("1 Month", 1),
    ("3 Months", 3),
    ("6 Months", 6),
    ("1 Year", 12),
    ("2 Years", 24),
    ("5 Years", 60),
];

#[derive(Debug, Clone)]
pub struct ReturnsInput {
    pub company_name: String,
    /// 0.0 when no price could be acquired.
    pub current_price: f64,
    /// Daily closes, oldest first.
    pub historical_prices: Vec<f64>,
    pub as_of: NaiveDate,
}

/// Without a current price there is nothing to measure or project from.
pub fn analyze_returns(input: &ReturnsInput) -> Result<ReturnsJudgment> {
    let price = ensure_range("current_price", input.current_price, 0.0, f64::MAX)?;
    if price == 0.0 {
        debug!(company = %input.company_name, "No price; skipping returns");
        return Ok(ReturnsJudgment::default());
    }

    let closes: Vec<f64> = input
        .historical_prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();

    let historical_returns = realised_returns(price, &closes)?;

    let annual_rate_pct = if historical_returns.is_empty() {
        DEFAULT_ANNUAL_RETURN_PCT
    } else {
        historical_returns.iter().map(|r| r.return_pct).sum::<f64>()
            / historical_returns.len() as f64
    };

    let investment_projections = project(price, annual_rate_pct, input.as_of)?;

    debug!(
        company = %input.company_name,
        periods = historical_returns.len(),
        annual_rate_pct = annual_rate_pct,
        "Returns analyzed"
    );

    Ok(ReturnsJudgment {
        historical_returns,
        investment_projections,
        annual_rate_pct,
    })
}

fn realised_returns(price: f64, closes: &[f64]) -> Result<Vec<HistoricalReturn>> {
    let Some(latest) = closes.len().checked_sub(1) else {
        return Ok(Vec::new());
    };

    let mut returns = Vec::new();
    for &(period, months) in PERIODS {
        let wanted = months as usize * SESSIONS_PER_MONTH;
        if latest + SESSION_SLACK < wanted {
            continue;
        }
        let sessions_back = wanted.min(latest);
        let start_price = closes[latest - sessions_back];

        let return_amount = price - start_price;
        let return_pct = ensure_finite("return_pct", return_amount / start_price * 100.0)?;

        returns.push(HistoricalReturn {
            period: period.to_string(),
            sessions_back,
            start_price,
            end_price: price,
            return_amount,
            return_pct,
            is_positive: return_pct >= 0.0,
        });
    }
    Ok(returns)
}

fn project(price: f64, annual_rate_pct: f64, as_of: NaiveDate) -> Result<Vec<InvestmentProjection>> {
    let growth = (1.0 + annual_rate_pct / 100.0).max(0.0);
    let based_on = format!("Historical avg: {:.1}% annual return", annual_rate_pct);

    PERIODS
        .iter()
        .map(|&(period, months)| {
            let years = f64::from(months) / 12.0;
            let future_price = ensure_finite("future_price", price * growth.powf(years))?;
            let return_amount = future_price - price;
            let return_pct = return_amount / price * 100.0;

            let end_date = as_of.checked_add_months(Months::new(months)).ok_or_else(|| {
                OrchestrationError::Agent(format!("{} projection overflows the calendar", period))
            })?;

            Ok(InvestmentProjection {
                period: period.to_string(),
                months,
                start_date: as_of,
                end_date,
                current_price: price,
                future_price,
                return_amount,
                return_pct,
                is_positive: return_pct >= 0.0,
                based_on: based_on.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn analyze(price: f64, closes: Vec<f64>) -> ReturnsJudgment {
        analyze_returns(&ReturnsInput {
            company_name: "Acme".to_string(),
            current_price: price,
            historical_prices: closes,
            as_of: as_of(),
        })
        .unwrap()
    }

    #[test]
    fn test_three_months_of_closes() {
        // 63 sessions: oldest 80.0, the one 21 sessions before the latest 100.0
        let mut closes = vec![90.0; 63];
        closes[0] = 80.0;
        closes[62 - 21] = 100.0;

        let r = analyze(120.0, closes);
        assert_eq!(r.historical_returns.len(), 2);

        let month = &r.historical_returns[0];
        assert_eq!(month.period, "1 Month");
        assert_eq!(month.sessions_back, 21);
        assert_eq!(month.start_price, 100.0);
        assert!((month.return_pct - 20.0).abs() < 1e-9);
        assert!(month.is_positive);

        let quarter = &r.historical_returns[1];
        assert_eq!(quarter.period, "3 Months");
        assert_eq!(quarter.sessions_back, 62);
        assert_eq!(quarter.start_price, 80.0);
        assert!((quarter.return_pct - 50.0).abs() < 1e-9);

        assert!((r.annual_rate_pct - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_history_uses_default_rate() {
        let r = analyze(50.0, vec![48.0, 49.0, 50.0]);
        assert!(r.historical_returns.is_empty());
        assert_eq!(r.annual_rate_pct, DEFAULT_ANNUAL_RETURN_PCT);
        assert_eq!(r.investment_projections.len(), 6);

        let year = &r.investment_projections[3];
        assert_eq!(year.period, "1 Year");
        assert!((year.future_price - 54.0).abs() < 1e-9);
        assert!((year.return_pct - 8.0).abs() < 1e-9);
        assert_eq!(year.end_date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(year.based_on, "Historical avg: 8.0% annual return");

        let five = &r.investment_projections[5];
        assert!((five.future_price - 50.0 * 1.08f64.powi(5)).abs() < 1e-9);
    }

    #[test]
    fn test_declining_history_projects_losses() {
        let mut closes = vec![100.0; 30];
        closes.push(80.0);
        let r = analyze(80.0, closes);

        assert_eq!(r.historical_returns.len(), 1);
        assert!(!r.historical_returns[0].is_positive);
        assert!(r.investment_projections.iter().all(|p| !p.is_positive));
    }

    #[test]
    fn test_missing_price_yields_nothing() {
        let r = analyze(0.0, vec![10.0; 70]);
        assert!(r.historical_returns.is_empty());
        assert!(r.investment_projections.is_empty());
    }

    #[test]
    fn test_overflowing_price_is_rejected() {
        let result = analyze_returns(&ReturnsInput {
            company_name: "Acme".to_string(),
            current_price: f64::MAX,
            historical_prices: vec![],
            as_of: as_of(),
        });
        assert!(result.is_err());
    }
}
