//! ESG scoring from name keywords and news sentiment

use super::{clamp, contains_any, ensure_range, IntoVote};
use crate::models::{AgentVote, EsgJudgment};
use crate::Result;
use tracing::debug;

const BASE_SCORE: f64 = 5.0;
const SENTIMENT_SCALE: f64 = 6.0;

/// A keyword category and the adjustment it applies to each pillar.
struct Category {
    keywords: &'static [&'static str],
    environmental: f64,
    social: f64,
    governance: f64,
    overall: f64,
    factor: &'static str,
}

const CATEGORIES: &[Category] = &[
    Category {
        keywords: &["solar", "wind", "renewable", "green", "clean", "sustainable"],
        environmental: 3.5,
        social: 0.0,
        governance: 0.0,
        overall: 2.5,
        factor: "Renewable energy sector",
    },
    Category {
        keywords: &["tech", "software", "digital", "cloud"],
        environmental: 1.5,
        social: 0.0,
        governance: 0.0,
        overall: 1.5,
        factor: "Technology sector with lower emissions",
    },
    Category {
        keywords: &["tesla", "electric", "ev "],
        environmental: 2.5,
        social: 0.0,
        governance: 0.0,
        overall: 2.0,
        factor: "Electric vehicle innovation",
    },
    Category {
        keywords: &["steel", "cement", "mining", "coal"],
        environmental: -2.5,
        social: 0.0,
        governance: 0.0,
        overall: -1.5,
        factor: "Heavy industrial emissions",
    },
    Category {
        keywords: &["oil", "petroleum", "exxon", "chevron", "shell", "bp"],
        environmental: -4.0,
        social: 0.0,
        governance: 0.0,
        overall: -3.0,
        factor: "Fossil fuel industry",
    },
    Category {
        keywords: &["apple", "microsoft", "google", "alphabet"],
        environmental: 0.0,
        social: 2.0,
        governance: 0.0,
        overall: 0.0,
        factor: "Strong employee programs",
    },
    Category {
        keywords: &["tobacco", "cigarette", "defense", "weapons"],
        environmental: 0.0,
        social: -3.5,
        governance: 0.0,
        overall: -3.0,
        factor: "Controversial social impact",
    },
    Category {
        keywords: &["tata", "reliance", "infosys", "wipro"],
        environmental: 0.0,
        social: 0.0,
        governance: 1.5,
        overall: 0.0,
        factor: "Established corporate governance",
    },
];

#[derive(Debug, Clone)]
pub struct EsgInput {
    pub company_name: String,
    /// Sentiment in [0,1]; callers substitute 0.5 when news is missing.
    pub news_sentiment: f64,
}

pub fn score_esg(input: &EsgInput) -> Result<EsgJudgment> {
    let sentiment = ensure_range("news_sentiment", input.news_sentiment, 0.0, 1.0)?;
    let name = input.company_name.to_lowercase();

    let mut overall = BASE_SCORE;
    let mut environmental = BASE_SCORE;
    let mut social = BASE_SCORE;
    let mut governance = BASE_SCORE;
    let mut factors = Vec::new();

    for category in CATEGORIES.iter().filter(|c| contains_any(&name, c.keywords)) {
        environmental += category.environmental;
        social += category.social;
        governance += category.governance;
        overall += category.overall;
        factors.push(category.factor.to_string());
    }

    let impact = (sentiment - 0.5) * SENTIMENT_SCALE;
    overall += impact;
    environmental += impact * 0.3;
    social += impact * 0.3;
    governance += impact * 0.4;

    if sentiment >= 0.6 {
        factors.push("Positive news sentiment".to_string());
    } else if sentiment <= 0.4 {
        factors.push("Negative news sentiment".to_string());
    }

    let judgment = EsgJudgment {
        overall: clamp(overall, 0.0, 10.0),
        environmental: clamp(environmental, 0.0, 10.0),
        social: clamp(social, 0.0, 10.0),
        governance: clamp(governance, 0.0, 10.0),
        factors,
    };

    debug!(
        company = %input.company_name,
        overall = judgment.overall,
        factors = judgment.factors.len(),
        "ESG scored"
    );

    Ok(judgment)
}

impl IntoVote for EsgJudgment {
    fn agent_name(&self) -> &'static str {
        "esg_scoring"
    }

    fn to_vote(&self) -> AgentVote {
        let decision = if self.overall >= 7.0 {
            "SUSTAINABLE"
        } else if self.overall >= 4.0 {
            "NEUTRAL"
        } else {
            "UNSUSTAINABLE"
        };

        AgentVote {
            agent_name: self.agent_name().to_string(),
            decision: decision.to_string(),
            confidence: clamp(self.overall / 10.0, 0.0, 1.0),
            reasoning: format!("ESG score {:.1}/10", self.overall),
        }
    }
}
