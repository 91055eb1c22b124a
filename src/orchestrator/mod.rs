//! Pipeline controller
//!
//! ACQUIRE → ESG → {RISK, TRADING, COMPLIANCE, REGULATION, SCENARIOS, RETURNS} → CONSENSUS → AUDIT
//!
//! Everything after ESG runs concurrently on a `JoinSet`; the first failing
//! stage aborts the analysis and the remaining tasks with it.

use crate::acquisition::SignalAcquirer;
use crate::agents::{
    analyze_regulations, analyze_returns, analyze_volatility, assess_risk, check_compliance,
    generate_signal, optimize_portfolio, score_esg, CompanyProfile, ComplianceInput, DigitalTwin,
    EsgInput, IntoVote, PortfolioCandidate, RegulationInput, ReturnsInput, RiskInput,
    TradingInput, VolatilityInput,
};
use crate::audit::AuditLedger;
use crate::config::PipelineConfig;
use crate::consensus::reach_consensus;
use crate::error::OrchestrationError;
use crate::models::{
    AnalysisRequest, AnalyzeResult, AuditVerification, CompanyComparison, ComplianceJudgment,
    ConsensusResult, DataQuality, EsgJudgment, PortfolioRequest, PortfolioResult,
    RegulationJudgment, ReturnsJudgment, RiskJudgment, ScenarioJudgment, SkippedCompany, TradingJudgment,
    TradingSignalSummary, UserRole, VolatilityJudgment,
};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Substituted when no news sentiment could be acquired.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;
pub const DEFAULT_RISK_TOLERANCE: f64 = 0.5;
pub const MIN_PORTFOLIO_COMPANIES: usize = 2;
pub const MAX_PORTFOLIO_COMPANIES: usize = 10;
/// Company name bounds in characters, after trimming.
pub const MIN_COMPANY_NAME_LEN: usize = 2;
pub const MAX_COMPANY_NAME_LEN: usize = 100;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Output of one concurrently executed stage.
enum StageOutput {
    Risk(VolatilityJudgment, RiskJudgment),
    Trading(TradingJudgment),
    Compliance(ComplianceJudgment),
    Regulation(RegulationJudgment),
    Scenarios(Vec<ScenarioJudgment>),
    Returns(ReturnsJudgment),
}

/// What gets hashed into the audit ledger.
#[derive(Serialize)]
struct AuditPayload<'a> {
    analysis_id: Uuid,
    company_name: &'a str,
    stock_symbol: &'a str,
    data_quality: DataQuality,
    esg: &'a EsgJudgment,
    risk: &'a RiskJudgment,
    trading: &'a TradingJudgment,
    compliance: &'a ComplianceJudgment,
    consensus: &'a ConsensusResult,
}

pub struct Orchestrator {
    acquirer: Arc<SignalAcquirer>,
    ledger: AuditLedger,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(acquirer: SignalAcquirer, ledger: AuditLedger, clock: Arc<dyn Clock>) -> Self {
        Self {
            acquirer: Arc::new(acquirer),
            ledger,
            clock,
        }
    }

    /// Live providers, fresh ledger, system clock.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(
            SignalAcquirer::from_config(config)?,
            AuditLedger::new(),
            Arc::new(SystemClock),
        ))
    }

    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    /// Full analysis of a single company.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalyzeResult> {
        let company_name = validate_company_name(&request.company_name)?;
        self.run_pipeline(company_name, request.user_role).await
    }

    /// Analyze every company concurrently and allocate across the ones that succeeded.
    ///
    /// Companies with no market data are skipped; any other failure aborts.
    pub async fn compare_portfolio(&self, request: PortfolioRequest) -> Result<PortfolioResult> {
        let start = Instant::now();

        let count = request.companies.len();
        if !(MIN_PORTFOLIO_COMPANIES..=MAX_PORTFOLIO_COMPANIES).contains(&count) {
            return Err(OrchestrationError::InvalidInput(format!(
                "portfolio comparison needs between {} and {} companies, got {}",
                MIN_PORTFOLIO_COMPANIES, MAX_PORTFOLIO_COMPANIES, count
            )));
        }

        let risk_tolerance = request.risk_tolerance.unwrap_or(DEFAULT_RISK_TOLERANCE);
        if !risk_tolerance.is_finite() || !(0.0..=1.0).contains(&risk_tolerance) {
            return Err(OrchestrationError::InvalidInput(format!(
                "risk_tolerance must be within [0, 1], got {}",
                risk_tolerance
            )));
        }

        let names = request
            .companies
            .iter()
            .map(|c| validate_company_name(c))
            .collect::<Result<Vec<_>>>()?;

        info!(
            companies = count,
            risk_tolerance = risk_tolerance,
            "Starting portfolio comparison"
        );

        let outcomes = futures::future::join_all(
            names
                .iter()
                .map(|name| self.run_pipeline(name, request.user_role)),
        )
        .await;

        let mut analyzed = Vec::new();
        let mut skipped = Vec::new();
        for (name, outcome) in names.iter().zip(outcomes) {
            match outcome {
                Ok(result) => analyzed.push(result),
                Err(OrchestrationError::CompanyNotFound(reason)) => {
                    warn!(company = %name, reason = %reason, "Skipping company without market data");
                    skipped.push(SkippedCompany {
                        company_name: name.to_string(),
                        reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if analyzed.is_empty() {
            return Err(OrchestrationError::NoValidCompanies(
                names.iter().map(|n| n.to_string()).collect(),
            ));
        }

        let candidates: Vec<PortfolioCandidate> = analyzed
            .iter()
            .map(|r| PortfolioCandidate {
                company_name: r.company_name.clone(),
                esg_score: r.esg_score,
                expected_return: r.trading_signal.price_change_pct,
            })
            .collect();

        let allocation = optimize_portfolio(&candidates, risk_tolerance)
            .map_err(|e| OrchestrationError::stage_failed("portfolio_optimization", e))?;

        let best_esg_company = extreme_by(&analyzed, |r| r.esg_score, |a, b| a > b);
        let lowest_risk_company = extreme_by(&analyzed, |r| r.risk_score, |a, b| a < b);

        let companies: Vec<CompanyComparison> = analyzed.iter().map(compare_row).collect();
        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            analyzed = companies.len(),
            skipped = skipped.len(),
            portfolio_esg = allocation.esg_score,
            processing_time_ms = processing_time_ms,
            "Portfolio comparison complete"
        );

        Ok(PortfolioResult {
            companies,
            optimal_allocation: allocation.weights,
            portfolio_esg_score: allocation.esg_score,
            portfolio_risk: allocation.portfolio_risk,
            expected_return: allocation.expected_return,
            best_esg_company,
            lowest_risk_company,
            skipped_companies: skipped,
            user_role: request.user_role,
            processing_time_ms,
            timestamp: self.clock.now(),
        })
    }

    pub async fn verify_audit(&self, transaction_id: &str) -> AuditVerification {
        self.ledger.verify(transaction_id.trim()).await
    }

    async fn run_pipeline(&self, company_name: &str, user_role: UserRole) -> Result<AnalyzeResult> {
        let start = Instant::now();
        let analysis_id = Uuid::new_v4();

        info!(
            analysis_id = %analysis_id,
            company = %company_name,
            role = ?user_role,
            "Starting analysis"
        );

        // === ACQUIRE ===
        let (bundle, outcome) = self.acquirer.acquire(company_name).await?;
        if !outcome.failures.is_empty() {
            debug!(
                company = %company_name,
                failures = ?outcome.failures,
                "Continuing with partial signals"
            );
        }

        let sentiment = bundle.news_sentiment.unwrap_or(NEUTRAL_SENTIMENT);
        let price = bundle.current_price.unwrap_or(0.0);
        let profile = CompanyProfile::infer(company_name, &bundle.stock_symbol);

        debug!(
            company = %company_name,
            industry = %profile.industry,
            region = %profile.region,
            "Company profile inferred"
        );

        // === ESG ===
        let esg = score_esg(&EsgInput {
            company_name: company_name.to_string(),
            news_sentiment: sentiment,
        })
        .map_err(|e| OrchestrationError::stage_failed("esg_scoring", e))?;

        // === FAN-OUT ===
        let mut stages: JoinSet<Result<StageOutput>> = JoinSet::new();

        let risk_input = RiskInput {
            company_name: company_name.to_string(),
            esg_score: esg.overall,
            news_sentiment: sentiment,
            volatility: 0.0,
        };
        let volatility_input = VolatilityInput {
            company_name: company_name.to_string(),
            historical_prices: bundle.historical_prices.clone(),
            esg_score: esg.overall,
        };
        stages.spawn(async move { risk_stage(&volatility_input, risk_input) });

        let trading_input = TradingInput {
            company_name: company_name.to_string(),
            symbol: bundle.stock_symbol.clone(),
            current_price: price,
            esg_score: esg.overall,
            news_sentiment: sentiment,
        };
        stages.spawn(async move {
            generate_signal(&trading_input)
                .map(StageOutput::Trading)
                .map_err(|e| OrchestrationError::stage_failed("trading", e))
        });

        let compliance_input = ComplianceInput {
            company_name: company_name.to_string(),
            industry: profile.industry.clone(),
            region: profile.region.clone(),
        };
        stages.spawn(async move {
            check_compliance(&compliance_input)
                .map(StageOutput::Compliance)
                .map_err(|e| OrchestrationError::stage_failed("compliance", e))
        });

        let regulation_input = RegulationInput {
            company_name: company_name.to_string(),
            industry: profile.industry.clone(),
            region: profile.region.clone(),
        };
        stages.spawn(async move {
            analyze_regulations(&regulation_input)
                .map(StageOutput::Regulation)
                .map_err(|e| OrchestrationError::stage_failed("regulation", e))
        });

        let twin = DigitalTwin::new(
            company_name,
            esg.overall,
            price,
            &profile.industry,
            self.clock.now(),
        )
        .map_err(|e| OrchestrationError::stage_failed("digital_twin", e))?;
        stages.spawn(async move {
            twin.stress_suite()
                .map(StageOutput::Scenarios)
                .map_err(|e| OrchestrationError::stage_failed("digital_twin", e))
        });

        let returns_input = ReturnsInput {
            company_name: company_name.to_string(),
            current_price: price,
            historical_prices: bundle.historical_prices.clone(),
            as_of: self.clock.now().date_naive(),
        };
        stages.spawn(async move {
            analyze_returns(&returns_input)
                .map(StageOutput::Returns)
                .map_err(|e| OrchestrationError::stage_failed("returns", e))
        });

        // === FAN-IN ===
        let mut volatility_risk = None;
        let mut trading = None;
        let mut compliance = None;
        let mut regulation = None;
        let mut scenarios = None;
        let mut returns = None;

        while let Some(joined) = stages.join_next().await {
            let output = joined.map_err(|e| OrchestrationError::stage_failed("agent_task", e))??;
            match output {
                StageOutput::Risk(v, r) => volatility_risk = Some((v, r)),
                StageOutput::Trading(t) => trading = Some(t),
                StageOutput::Compliance(c) => compliance = Some(c),
                StageOutput::Regulation(r) => regulation = Some(r),
                StageOutput::Scenarios(s) => scenarios = Some(s),
                StageOutput::Returns(r) => returns = Some(r),
            }
        }

        let (volatility, risk) = volatility_risk.ok_or_else(|| missing("risk_assessment"))?;
        let trading = trading.ok_or_else(|| missing("trading"))?;
        let compliance = compliance.ok_or_else(|| missing("compliance"))?;
        let regulation = regulation.ok_or_else(|| missing("regulation"))?;
        let scenarios = scenarios.ok_or_else(|| missing("digital_twin"))?;
        let returns = returns.ok_or_else(|| missing("returns"))?;

        // === CONSENSUS ===
        let votes = vec![risk.to_vote(), trading.to_vote(), compliance.to_vote()];
        let consensus = reach_consensus(&votes);

        // === AUDIT ===
        let timestamp = self.clock.now();
        let payload = serde_json::to_string(&AuditPayload {
            analysis_id,
            company_name,
            stock_symbol: &bundle.stock_symbol,
            data_quality: bundle.data_quality,
            esg: &esg,
            risk: &risk,
            trading: &trading,
            compliance: &compliance,
            consensus: &consensus,
        })
        .map_err(|e| OrchestrationError::stage_failed("audit", e))?;

        let audit_transaction_id = self
            .ledger
            .record(company_name, &payload, timestamp.timestamp())
            .await;

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            analysis_id = %analysis_id,
            company = %company_name,
            esg = esg.overall,
            risk_level = %risk.level,
            action = %trading.action,
            consensus = %consensus.final_decision,
            data_quality = %bundle.data_quality,
            processing_time_ms = processing_time_ms,
            "Analysis complete"
        );

        Ok(AnalyzeResult {
            analysis_id,
            company_name: company_name.to_string(),
            esg_score: esg.overall,
            esg,
            risk_action: risk.action,
            risk_level: risk.level,
            risk_score: risk.score,
            risk_reasons: risk.reasons,
            trading_signal: TradingSignalSummary::from(&trading),
            compliance,
            regulation,
            volatility,
            scenarios,
            historical_returns: returns.historical_returns,
            investment_projections: returns.investment_projections,
            consensus,
            data_quality: bundle.data_quality,
            audit_transaction_id,
            user_role,
            processing_time_ms,
            timestamp,
        })
    }
}

/// Volatility feeds risk, so the two run as one stage.
fn risk_stage(volatility_input: &VolatilityInput, risk_input: RiskInput) -> Result<StageOutput> {
    let volatility = analyze_volatility(volatility_input)
        .map_err(|e| OrchestrationError::stage_failed("volatility", e))?;
    let risk = assess_risk(&RiskInput {
        volatility: volatility.predicted_volatility,
        ..risk_input
    })
    .map_err(|e| OrchestrationError::stage_failed("risk_assessment", e))?;
    Ok(StageOutput::Risk(volatility, risk))
}

fn validate_company_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    let len = name.chars().count();
    if !(MIN_COMPANY_NAME_LEN..=MAX_COMPANY_NAME_LEN).contains(&len) {
        return Err(OrchestrationError::InvalidInput(format!(
            "company_name must be between {} and {} characters, got {}",
            MIN_COMPANY_NAME_LEN, MAX_COMPANY_NAME_LEN, len
        )));
    }
    Ok(name)
}

fn missing(stage: &str) -> OrchestrationError {
    OrchestrationError::stage_failed(stage, "stage produced no output")
}

/// First result whose key beats every earlier one under `better`.
fn extreme_by<F, C>(results: &[AnalyzeResult], key: F, better: C) -> String
where
    F: Fn(&AnalyzeResult) -> f64,
    C: Fn(f64, f64) -> bool,
{
    let mut best: Option<&AnalyzeResult> = None;
    for r in results {
        if best.map_or(true, |b| better(key(r), key(b))) {
            best = Some(r);
        }
    }
    best.map(|r| r.company_name.clone()).unwrap_or_default()
}

fn compare_row(r: &AnalyzeResult) -> CompanyComparison {
    CompanyComparison {
        company_name: r.company_name.clone(),
        esg_score: r.esg_score,
        environmental: r.esg.environmental,
        social: r.esg.social,
        governance: r.esg.governance,
        risk_level: r.risk_level,
        risk_score: r.risk_score,
        trading_signal: r.trading_signal.clone(),
        compliance_score: r.compliance.score,
        regulatory_risk: r.regulation.risk_score,
        audit_transaction_id: r.audit_transaction_id.clone(),
    }
}
