//! Regulatory compliance check by region, industry and name

use super::{contains_any, IntoVote};
use crate::models::{AgentVote, ComplianceJudgment};
use crate::Result;
use tracing::debug;

const COMPLIANT_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct ComplianceInput {
    pub company_name: String,
    pub industry: String,
    pub region: String,
}

/// Short codes ("eu", "us", "in") must match the whole region; longer
/// names ("europe", "america", "india") may appear anywhere in it.
pub(crate) fn region_matches(region: &str, code: &str, long_name: &str) -> bool {
    let region = region.trim().to_lowercase();
    region == code || region.contains(long_name)
}

pub fn check_compliance(input: &ComplianceInput) -> Result<ComplianceJudgment> {
    let name = input.company_name.to_lowercase();
    let industry = input.industry.to_lowercase();

    let mut score = 100.0;
    let mut is_compliant = true;
    let mut violations = Vec::new();
    let mut regulations = vec![
        "ISO 14001 Environmental Management".to_string(),
        "GRI Sustainability Reporting Standards".to_string(),
    ];

    let mut add = |list: &[&str]| regulations.extend(list.iter().map(|r| r.to_string()));

    if region_matches(&input.region, "eu", "europe") {
        add(&[
            "EU Taxonomy Regulation",
            "CSRD (Corporate Sustainability Reporting Directive)",
            "SFDR (Sustainable Finance Disclosure Regulation)",
        ]);
    }
    if region_matches(&input.region, "us", "america") {
        add(&["SEC Climate Disclosure Rules", "EPA Environmental Regulations"]);
    }
    if region_matches(&input.region, "in", "india") {
        add(&[
            "SEBI BRSR (Business Responsibility and Sustainability Reporting)",
            "Companies Act 2013 CSR Requirements",
        ]);
    }

    // Names only flag "petroleum"; bare "oil"/"gas" substrings hit "Las Vegas".
    let fossil = contains_any(&industry, &["oil", "gas"]) || name.contains("petroleum");
    if fossil {
        add(&["Methane Emissions Regulations", "Oil Spill Prevention Requirements"]);
        score -= 15.0;
        violations.push("High-risk industry requiring enhanced monitoring".to_string());
    }
    if contains_any(&industry, &["finance", "bank"]) {
        add(&["Basel III ESG Risk Management", "Green Finance Guidelines"]);
    }
    if contains_any(&industry, &["manufacturing", "industrial"]) {
        add(&["Industrial Emissions Directive", "Waste Management Regulations"]);
    }

    if contains_any(&name, &["tobacco", "cigarette"]) {
        violations.push("Tobacco industry - restricted under ESG frameworks".to_string());
        score -= 40.0;
        is_compliant = false;
    }
    if contains_any(&name, &["weapons", "defense"]) {
        violations.push("Defense industry - ethical concerns".to_string());
        score -= 25.0;
    }

    if score < COMPLIANT_THRESHOLD {
        is_compliant = false;
    }
    let score = f64::max(score, 0.0);

    debug!(
        company = %input.company_name,
        score = score,
        compliant = is_compliant,
        violations = violations.len(),
        "Compliance checked"
    );

    Ok(ComplianceJudgment {
        is_compliant,
        violations,
        regulations,
        score,
    })
}

impl IntoVote for ComplianceJudgment {
    fn agent_name(&self) -> &'static str {
        "compliance"
    }

    fn to_vote(&self) -> AgentVote {
        let decision = if self.is_compliant {
            "COMPLIANT"
        } else {
            "NON_COMPLIANT"
        };

        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: decision.to_string(),
            confidence: (self.score / 100.0).clamp(0.0, 1.0),
            reasoning: if self.violations.is_empty() {
                "No compliance violations found".to_string()
            } else {
                self.violations.join("; ")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, industry: &str, region: &str) -> ComplianceJudgment {
        check_compliance(&ComplianceInput {
            company_name: name.to_string(),
            industry: industry.to_string(),
            region: region.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_tobacco_is_non_compliant() {
        let c = check("Acme Tobacco Co", "technology", "india");
        assert!(!c.is_compliant);
        assert!(c.score <= 60.0);
        assert_eq!(c.score, 60.0);
        assert_eq!(c.to_vote().decision, "NON_COMPLIANT");
    }

    #[test]
    fn test_clean_company_is_compliant() {
        let c = check("SolarTech Renewables", "energy", "us");
        assert!(c.is_compliant);
        assert_eq!(c.score, 100.0);
        assert!(c.violations.is_empty());
        assert!(c
            .regulations
            .contains(&"SEC Climate Disclosure Rules".to_string()));
        assert!(!c
            .regulations
            .iter()
            .any(|r| r.starts_with("SEBI")));
    }

    #[test]
    fn test_penalties_stack_and_floor() {
        let c = check("Petroleum Weapons Tobacco", "energy", "us");
        assert!(!c.is_compliant);
        assert_eq!(c.score, 20.0);
        assert_eq!(c.violations.len(), 3);

        let c = check("Defense Systems", "technology", "us");
        assert!(c.is_compliant);
        assert_eq!(c.score, 75.0);
    }

    #[test]
    fn test_oil_and_gas_substrings_in_name_are_not_penalised() {
        for name in ["Las Vegas Sands", "Boiler Works", "Gaslight Media"] {
            let c = check(name, "technology", "us");
            assert_eq!(c.score, 100.0, "{}", name);
            assert!(c.violations.is_empty(), "{}", name);
        }

        let c = check("Bharat Petroleum", "energy", "india");
        assert_eq!(c.score, 85.0);
        assert_eq!(c.violations.len(), 1);

        let c = check("Acme Holdings", "oil_gas", "us");
        assert_eq!(c.score, 85.0);
        assert!(c
            .regulations
            .contains(&"Methane Emissions Regulations".to_string()));
    }

    #[test]
    fn test_region_matching() {
        assert!(region_matches("EU", "eu", "europe"));
        assert!(region_matches("Western Europe", "eu", "europe"));
        assert!(!region_matches("russia", "us", "america"));
        assert!(!region_matches("china", "in", "india"));
        assert!(region_matches("india", "in", "india"));
    }
}
