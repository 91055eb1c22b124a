//! Core data models for the ESG orchestration pipeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    Full,
    PartialNoNews,
    PartialNoPrice,
    None,
}

impl DataQuality {
    pub fn from_presence(has_sentiment: bool, has_price: bool) -> Self {
        match (has_sentiment, has_price) {
            (true, true) => DataQuality::Full,
            (false, true) => DataQuality::PartialNoNews,
            (true, false) => DataQuality::PartialNoPrice,
            (false, false) => DataQuality::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskAction {
    Approve,
    Review,
    Reject,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

/// Caller role, carried through for masking in the transport layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Trader,
    Compliance,
    Risk,
    Admin,
}

impl UserRole {
    /// Roles allowed to see unmasked audit details.
    pub fn is_privileged(&self) -> bool {
        matches!(self, UserRole::Compliance | UserRole::Admin)
    }
}

//
// ================= Signals =================
//

/// Everything acquisition learned about one company for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBundle {
    pub company_name: String,
    pub news_sentiment: Option<f64>,
    pub stock_symbol: String,
    pub current_price: Option<f64>,
    /// Oldest first.
    pub historical_prices: Vec<f64>,
    pub data_quality: DataQuality,
}

impl SignalBundle {
    pub fn new(
        company_name: String,
        stock_symbol: String,
        news_sentiment: Option<f64>,
        current_price: Option<f64>,
        historical_prices: Vec<f64>,
    ) -> Self {
        let news_sentiment = news_sentiment.map(|s| s.clamp(0.0, 1.0));
        let current_price = current_price.map(|p| p.max(0.0));
        let data_quality =
            DataQuality::from_presence(news_sentiment.is_some(), current_price.is_some());

        Self {
            company_name,
            news_sentiment,
            stock_symbol,
            current_price,
            historical_prices,
            data_quality,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionOutcome {
    pub price_source: Option<String>,
    pub sentiment_source: Option<String>,
    pub failures: Vec<String>,
    pub elapsed_ms: u64,
}

//
// ================= Judgments =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsgJudgment {
    pub overall: f64,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskJudgment {
    pub action: RiskAction,
    pub level: RiskLevel,
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingJudgment {
    pub action: TradeAction,
    pub symbol: String,
    pub current_price: f64,
    pub target_price: f64,
    pub price_change_pct: f64,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceJudgment {
    pub is_compliant: bool,
    pub violations: Vec<String>,
    pub regulations: Vec<String>,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationJudgment {
    pub applicable_regulations: Vec<String>,
    pub upcoming_changes: Vec<String>,
    pub risk_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityJudgment {
    pub predicted_volatility: f64,
    pub market_correlation: f64,
    pub insights: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioJudgment {
    pub scenario: String,
    pub esg_delta: f64,
    pub value_delta: f64,
    pub recommendations: Vec<String>,
}

/// Realised return over one look-back period, ending at the current price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalReturn {
    pub period: String,
    pub sessions_back: usize,
    pub start_price: f64,
    pub end_price: f64,
    pub return_amount: f64,
    pub return_pct: f64,
    pub is_positive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentProjection {
    pub period: String,
    pub months: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub current_price: f64,
    pub future_price: f64,
    pub return_amount: f64,
    pub return_pct: f64,
    pub is_positive: bool,
    pub based_on: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnsJudgment {
    pub historical_returns: Vec<HistoricalReturn>,
    pub investment_projections: Vec<InvestmentProjection>,
    /// Annual rate the projections compound at, in percent.
    pub annual_rate_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub portfolio_risk: f64,
    pub esg_score: f64,
}

//
// ================= Consensus =================
//

/// One agent's judgment normalized for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentVote {
    pub agent_name: String,
    pub decision: String,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub final_decision: String,
    pub confidence: f64,
    pub supporting_agents: Vec<String>,
    pub dissenting_agents: Vec<String>,
}

//
// ================= Audit =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub transaction_id: String,
    pub company_name: String,
    pub serialized_analysis: String,
    pub timestamp_unix: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditVerification {
    pub found: bool,
    pub serialized_analysis: String,
    pub timestamp_unix: i64,
}

//
// ================= Requests =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub company_name: String,
    #[serde(default)]
    pub user_role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    pub companies: Vec<String>,
    pub risk_tolerance: Option<f64>,
    #[serde(default)]
    pub user_role: UserRole,
}

//
// ================= Final Results =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignalSummary {
    pub action: TradeAction,
    pub symbol: String,
    pub current_price: f64,
    pub target_price: f64,
    pub price_change_pct: f64,
    pub confidence: f64,
}

impl From<&TradingJudgment> for TradingSignalSummary {
    fn from(t: &TradingJudgment) -> Self {
        Self {
            action: t.action,
            symbol: t.symbol.clone(),
            current_price: t.current_price,
            target_price: t.target_price,
            price_change_pct: t.price_change_pct,
            confidence: t.confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub analysis_id: Uuid,
    pub company_name: String,
    pub esg_score: f64,
    pub esg: EsgJudgment,
    pub risk_action: RiskAction,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub risk_reasons: Vec<String>,
    pub trading_signal: TradingSignalSummary,
    pub compliance: ComplianceJudgment,
    pub regulation: RegulationJudgment,
    pub volatility: VolatilityJudgment,
    pub scenarios: Vec<ScenarioJudgment>,
    pub historical_returns: Vec<HistoricalReturn>,
    pub investment_projections: Vec<InvestmentProjection>,
    pub consensus: ConsensusResult,
    pub data_quality: DataQuality,
    pub audit_transaction_id: String,
    pub user_role: UserRole,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyComparison {
    pub company_name: String,
    pub esg_score: f64,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub trading_signal: TradingSignalSummary,
    pub compliance_score: f64,
    pub regulatory_risk: f64,
    pub audit_transaction_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCompany {
    pub company_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub companies: Vec<CompanyComparison>,
    pub optimal_allocation: Vec<f64>,
    pub portfolio_esg_score: f64,
    pub portfolio_risk: f64,
    pub expected_return: f64,
    pub best_esg_company: String,
    pub lowest_risk_company: String,
    pub skipped_companies: Vec<SkippedCompany>,
    pub user_role: UserRole,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

//
// ================= Display =================
//

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for RiskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskAction::Approve => "APPROVE",
            RiskAction::Review => "REVIEW",
            RiskAction::Reject => "REJECT",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataQuality::Full => "FULL",
            DataQuality::PartialNoNews => "PARTIAL_NO_NEWS",
            DataQuality::PartialNoPrice => "PARTIAL_NO_PRICE",
            DataQuality::None => "NONE",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for UserRole {
    type Err = std::convert::Infallible;

    /// Unknown roles fall back to the least privileged one.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "COMPLIANCE" => UserRole::Compliance,
            "RISK" => UserRole::Risk,
            "ADMIN" => UserRole::Admin,
            _ => UserRole::Trader,
        })
    }
}
