//! Regulatory landscape by region and industry

use super::compliance::region_matches;
use super::{contains_any, IntoVote};
use crate::models::{AgentVote, RegulationJudgment};
use crate::Result;
use tracing::debug;

const BASE_RISK: f64 = 30.0;
const HIGH_RISK: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct RegulationInput {
    pub company_name: String,
    pub industry: String,
    pub region: String,
}

struct Exposure {
    risk: f64,
    regulations: &'static [&'static str],
    upcoming: &'static [&'static str],
    recommendations: &'static [&'static str],
}

const EU: Exposure = Exposure {
    risk: 25.0,
    regulations: &[
        "EU Taxonomy for Sustainable Activities",
        "Corporate Sustainability Reporting Directive (CSRD)",
        "EU Green Deal",
        "Carbon Border Adjustment Mechanism (CBAM)",
    ],
    upcoming: &[
        "CSRD mandatory reporting from 2024",
        "CBAM full implementation by 2026",
    ],
    recommendations: &[
        "Prepare for CSRD double materiality assessment",
        "Implement carbon accounting systems",
    ],
};

const US: Exposure = Exposure {
    risk: 15.0,
    regulations: &[
        "SEC Climate Disclosure Rules",
        "EPA Greenhouse Gas Reporting",
        "Inflation Reduction Act incentives",
    ],
    upcoming: &["SEC climate rules phased implementation 2024-2026"],
    recommendations: &[],
};

const INDIA: Exposure = Exposure {
    risk: 10.0,
    regulations: &[
        "SEBI BRSR (Business Responsibility and Sustainability Reporting)",
        "Companies Act 2013 - CSR provisions",
        "National Action Plan on Climate Change",
    ],
    upcoming: &[],
    recommendations: &["Ensure BRSR Core compliance for top 1000 listed entities"],
};

const FINANCE: Exposure = Exposure {
    risk: 20.0,
    regulations: &[
        "Basel III ESG Risk Management",
        "TCFD Recommendations",
        "Green Finance Guidelines",
    ],
    upcoming: &[],
    recommendations: &[
        "Integrate climate risk into credit assessments",
        "Develop green lending portfolio",
    ],
};

const ENERGY: Exposure = Exposure {
    risk: 35.0,
    regulations: &[
        "Methane Emissions Regulations",
        "Renewable Energy Mandates",
        "Carbon Pricing Mechanisms",
    ],
    upcoming: &[],
    recommendations: &[
        "Develop transition plan to renewable energy",
        "Implement methane leak detection systems",
    ],
};

const MANUFACTURING: Exposure = Exposure {
    risk: 18.0,
    regulations: &[
        "Industrial Emissions Directive",
        "Extended Producer Responsibility",
        "Circular Economy Regulations",
    ],
    upcoming: &[],
    recommendations: &[],
};

pub fn analyze_regulations(input: &RegulationInput) -> Result<RegulationJudgment> {
    let industry = input.industry.to_lowercase();

    let exposures = [
        (region_matches(&input.region, "eu", "europe"), &EU),
        (region_matches(&input.region, "us", "america"), &US),
        (region_matches(&input.region, "in", "india"), &INDIA),
        (contains_any(&industry, &["finance", "bank"]), &FINANCE),
        (contains_any(&industry, &["energy", "oil"]), &ENERGY),
        (industry.contains("manufacturing"), &MANUFACTURING),
    ];

    let mut judgment = RegulationJudgment {
        applicable_regulations: Vec::new(),
        upcoming_changes: Vec::new(),
        risk_score: BASE_RISK,
        recommendations: Vec::new(),
    };

    for (_, exposure) in exposures.iter().filter(|(applies, _)| *applies) {
        judgment.risk_score += exposure.risk;
        extend(&mut judgment.applicable_regulations, exposure.regulations);
        extend(&mut judgment.upcoming_changes, exposure.upcoming);
        extend(&mut judgment.recommendations, exposure.recommendations);
    }

    judgment.risk_score = judgment.risk_score.min(100.0);

    if judgment.risk_score > HIGH_RISK {
        extend(
            &mut judgment.recommendations,
            &[
                "High regulatory risk - establish dedicated compliance team",
                "Conduct regular regulatory horizon scanning",
            ],
        );
    }

    debug!(
        company = %input.company_name,
        region = %input.region,
        industry = %input.industry,
        risk_score = judgment.risk_score,
        "Regulations analyzed"
    );

    Ok(judgment)
}

fn extend(target: &mut Vec<String>, items: &[&str]) {
    target.extend(items.iter().map(|s| s.to_string()));
}

impl IntoVote for RegulationJudgment {
    fn agent_name(&self) -> &'static str {
        "regulation"
    }

    fn to_vote(&self) -> AgentVote {
        let decision = if self.risk_score > HIGH_RISK {
            "REGULATORY_RISK_HIGH"
        } else {
            "REGULATORY_RISK_LOW"
        };

        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: decision.to_string(),
            confidence: (self.risk_score / 100.0).clamp(0.0, 1.0),
            reasoning: format!(
                "{} applicable regulations, risk {:.0}/100",
                self.applicable_regulations.len(),
                self.risk_score
            ),
        }
    }
}
