//! Industry and region inference from the company name and ticker

use super::contains_any;
use serde::{Deserialize, Serialize};

/// Matched against whole words of the name.
const FOSSIL_WORDS: &[&str] = &[
    "oil", "gas", "petroleum", "exxon", "chevron", "shell", "bp", "ongc",
];
const ENERGY_KEYWORDS: &[&str] = &["coal", "energy", "power", "solar", "wind", "renewable"];
const FINANCE_KEYWORDS: &[&str] = &[
    "bank", "finance", "financial", "capital", "insurance", "hdfc", "icici",
];
const MANUFACTURING_KEYWORDS: &[&str] = &[
    "steel", "cement", "motors", "manufacturing", "industrial", "industries", "mining",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub industry: String,
    pub region: String,
}

impl CompanyProfile {
    /// Oil and gas, energy, finance and manufacturing are checked in that
    /// order; anything else is treated as technology. `.NS` tickers are
    /// Indian listings.
    pub fn infer(company_name: &str, symbol: &str) -> Self {
        let lower = company_name.to_lowercase();
        let fossil = lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| FOSSIL_WORDS.contains(&word));

        let industry = if fossil {
            "oil_gas"
        } else if contains_any(&lower, ENERGY_KEYWORDS) {
            "energy"
        } else if contains_any(&lower, FINANCE_KEYWORDS) {
            "finance"
        } else if contains_any(&lower, MANUFACTURING_KEYWORDS) {
            "manufacturing"
        } else {
            "technology"
        };

        let region = if symbol.to_uppercase().ends_with(".NS") {
            "india"
        } else {
            "us"
        };

        Self {
            industry: industry.to_string(),
            region: region.to_string(),
        }
    }
}
