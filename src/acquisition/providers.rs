//! HTTP-backed market data and news providers
//!
//! Each provider owns a long-lived reqwest::Client for connection pooling.
//! Response parsing is split into pure functions so it can be tested
//! without the network.

use super::{PriceProvider, PriceQuote, SentimentProvider};
use crate::config::PipelineConfig;
use crate::error::OrchestrationError;
use crate::Result;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Articles considered per sentiment request
const MAX_ARTICLES: usize = 20;
const KEYWORD_WEIGHT: f64 = 0.05;

const POSITIVE_KEYWORDS: &[&str] = &[
    "growth", "profit", "success", "innovation", "sustainable",
    "green", "award", "expansion", "breakthrough",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "loss", "decline", "scandal", "lawsuit", "pollution",
    "violation", "fine", "layoff", "bankruptcy",
];

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(8)
        .timeout(timeout)
        .build()?)
}

fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    Url::parse_with_params(&format!("{}{}", base, path), params)
        .map_err(|e| OrchestrationError::Provider(format!("invalid provider URL: {}", e)))
}

async fn get_json(client: &Client, url: Url, provider: &str) -> Result<Value> {
    let response = client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await
        .map_err(|e| OrchestrationError::Provider(format!("{} request failed: {}", provider, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(OrchestrationError::Provider(format!(
            "{} returned status {}",
            provider, status
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| OrchestrationError::Provider(format!("{} returned invalid JSON: {}", provider, e)))
}

//
// ================= Yahoo Finance (primary price) =================
//

pub struct YahooFinanceProvider {
    client: Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &'static str {
        "yahoo_finance"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        let url = yahoo_chart_url(&self.base_url, symbol)?;

        debug!(symbol = %symbol, "Requesting Yahoo Finance chart");
        let body = get_json(&self.client, url, self.name()).await?;
        parse_yahoo_chart(&body)
    }
}

/// The symbol is pushed as one percent-encoded path segment.
pub fn yahoo_chart_url(base_url: &str, symbol: &str) -> Result<Url> {
    let mut url = build_url(
        base_url,
        "/v8/finance/chart",
        &[("range", "3mo"), ("interval", "1d")],
    )?;
    url.path_segments_mut()
        .map_err(|_| OrchestrationError::Provider(format!("invalid provider URL: {}", base_url)))?
        .push(symbol);
    Ok(url)
}

/// Extract the market price and the daily closes from a chart response.
pub fn parse_yahoo_chart(body: &Value) -> Result<PriceQuote> {
    let result = body
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or_else(|| OrchestrationError::Provider("yahoo finance: no result data".to_string()))?;

    let price = result
        .get("meta")
        .and_then(|m| m.get("regularMarketPrice"))
        .and_then(Value::as_f64)
        .ok_or_else(|| OrchestrationError::Provider("yahoo finance: no price data".to_string()))?;

    // Null closes mark non-trading days.
    let historical_prices = result
        .pointer("/indicators/quote/0/close")
        .and_then(Value::as_array)
        .map(|closes| {
            closes
                .iter()
                .filter_map(Value::as_f64)
                .filter(|p| p.is_finite() && *p > 0.0)
                .collect()
        })
        .unwrap_or_default();

    Ok(PriceQuote {
        price,
        historical_prices,
    })
}

//
// ================= Alpha Vantage (secondary price) =================
//

pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            OrchestrationError::Provider("ALPHA_VANTAGE_KEY is not configured".to_string())
        })?;

        // Alpha Vantage lists Indian tickers without the exchange suffix.
        let clean_symbol = symbol.trim_end_matches(".NS");
        let url = build_url(
            &self.base_url,
            "/query",
            &[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", clean_symbol),
                ("apikey", api_key),
            ],
        )?;

        let body = get_json(&self.client, url, self.name()).await?;
        let price = parse_alpha_vantage_quote(&body)?;

        Ok(PriceQuote {
            price,
            historical_prices: Vec::new(),
        })
    }
}

pub fn parse_alpha_vantage_quote(body: &Value) -> Result<f64> {
    let quote = body
        .get("Global Quote")
        .and_then(Value::as_object)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| OrchestrationError::Provider("alpha vantage: no quote data".to_string()))?;

    let raw = quote
        .get("05. price")
        .and_then(Value::as_str)
        .ok_or_else(|| OrchestrationError::Provider("alpha vantage: no price field".to_string()))?;

    let price: f64 = raw.trim().parse().map_err(|_| {
        OrchestrationError::Provider(format!("alpha vantage: unparseable price '{}'", raw))
    })?;

    if price <= 0.0 || !price.is_finite() {
        return Err(OrchestrationError::Provider(
            "alpha vantage: invalid price".to_string(),
        ));
    }

    Ok(price)
}

//
// ================= NewsAPI (sentiment) =================
//

pub struct NewsApiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl SentimentProvider for NewsApiProvider {
    fn name(&self) -> &'static str {
        "news_api"
    }

    async fn fetch_sentiment(&self, company_name: &str) -> Result<f64> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            OrchestrationError::Provider("NEWS_API_KEY is not configured".to_string())
        })?;

        let page_size = MAX_ARTICLES.to_string();
        let url = build_url(
            &self.base_url,
            "/v2/everything",
            &[
                ("q", company_name),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ],
        )?;

        let body = get_json(&self.client, url, self.name()).await?;

        let articles = body
            .get("articles")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                warn!(company = %company_name, "No news articles returned");
                OrchestrationError::Provider(format!(
                    "no news articles found for company: {}",
                    company_name
                ))
            })?;

        let texts: Vec<String> = articles.iter().map(article_text).collect();
        Ok(score_headlines(&texts))
    }
}

fn article_text(article: &Value) -> String {
    let field = |name: &str| article.get(name).and_then(Value::as_str).unwrap_or_default();
    format!("{} {}", field("title"), field("description"))
}

/// Keyword sentiment over at most 20 texts, 0.5 neutral, clamped to [0,1].
pub fn score_headlines(texts: &[String]) -> f64 {
    let mut score = 0.0;

    for text in texts.iter().take(MAX_ARTICLES) {
        let lower = text.to_lowercase();

        let positive = POSITIVE_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count();
        let negative = NEGATIVE_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count();

        score += KEYWORD_WEIGHT * positive as f64;
        score -= KEYWORD_WEIGHT * negative as f64;
    }

    (0.5 + score).clamp(0.0, 1.0)
}

/// The three live providers described by the configuration.
pub fn live_providers(
    config: &PipelineConfig,
) -> Result<(YahooFinanceProvider, AlphaVantageProvider, NewsApiProvider)> {
    Ok((
        YahooFinanceProvider::new(&config.yahoo_base_url, config.provider_timeout)?,
        AlphaVantageProvider::new(
            &config.alpha_vantage_base_url,
            config.alpha_vantage_key.clone(),
            config.provider_timeout,
        )?,
        NewsApiProvider::new(
            &config.news_api_base_url,
            config.news_api_key.clone(),
            config.provider_timeout,
        )?,
    ))
}
