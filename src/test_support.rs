//! In-process providers for tests. No network access.

use crate::acquisition::{PriceProvider, PriceQuote, SentimentProvider, SignalAcquirer, SymbolTable};
use crate::error::OrchestrationError;
use crate::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Always returns the same quote.
pub struct StaticPrice {
    quote: PriceQuote,
}

impl StaticPrice {
    pub fn new(price: f64) -> Self {
        Self::with_history(price, Vec::new())
    }

    pub fn with_history(price: f64, historical_prices: Vec<f64>) -> Self {
        Self {
            quote: PriceQuote {
                price,
                historical_prices,
            },
        }
    }
}

#[async_trait::async_trait]
impl PriceProvider for StaticPrice {
    fn name(&self) -> &'static str {
        "static_price"
    }

    async fn fetch_price(&self, _symbol: &str) -> Result<PriceQuote> {
        Ok(self.quote.clone())
    }
}

pub struct StaticSentiment(pub f64);

#[async_trait::async_trait]
impl SentimentProvider for StaticSentiment {
    fn name(&self) -> &'static str {
        "static_sentiment"
    }

    async fn fetch_sentiment(&self, _company_name: &str) -> Result<f64> {
        Ok(self.0)
    }
}

/// Fails every call, for both price and sentiment.
pub struct FailingProvider;

#[async_trait::async_trait]
impl PriceProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        Err(OrchestrationError::Provider(format!("no quote for {}", symbol)))
    }
}

#[async_trait::async_trait]
impl SentimentProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch_sentiment(&self, company_name: &str) -> Result<f64> {
        Err(OrchestrationError::Provider(format!(
            "no news articles found for company: {}",
            company_name
        )))
    }
}

/// Never answers within any reasonable timeout.
pub struct SlowProvider(pub Duration);

#[async_trait::async_trait]
impl PriceProvider for SlowProvider {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn fetch_price(&self, _symbol: &str) -> Result<PriceQuote> {
        tokio::time::sleep(self.0).await;
        Ok(PriceQuote {
            price: 1.0,
            historical_prices: Vec::new(),
        })
    }
}

#[async_trait::async_trait]
impl SentimentProvider for SlowProvider {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn fetch_sentiment(&self, _company_name: &str) -> Result<f64> {
        tokio::time::sleep(self.0).await;
        Ok(0.5)
    }
}

/// Never completes; counts calls started and calls dropped mid-flight.
#[derive(Clone, Default)]
pub struct StalledProvider {
    pub started: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicUsize>,
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl StalledProvider {
    async fn stall<T>(&self) -> Result<T> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _guard = DropCounter(self.dropped.clone());
        std::future::pending::<()>().await;
        Err(OrchestrationError::Provider("stalled".to_string()))
    }
}

#[async_trait::async_trait]
impl PriceProvider for StalledProvider {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn fetch_price(&self, _symbol: &str) -> Result<PriceQuote> {
        self.stall().await
    }
}

#[async_trait::async_trait]
impl SentimentProvider for StalledProvider {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn fetch_sentiment(&self, _company_name: &str) -> Result<f64> {
        self.stall().await
    }
}

/// Per-symbol prices and per-company sentiment; anything unknown fails.
#[derive(Default)]
pub struct MarketFixture {
    prices: HashMap<String, PriceQuote>,
    sentiment: HashMap<String, f64>,
}

impl MarketFixture {
    pub fn with_price(mut self, symbol: &str, price: f64, history: Vec<f64>) -> Self {
        self.prices.insert(
            symbol.to_string(),
            PriceQuote {
                price,
                historical_prices: history,
            },
        );
        self
    }

    pub fn with_sentiment(mut self, company_name: &str, sentiment: f64) -> Self {
        self.sentiment.insert(company_name.to_lowercase(), sentiment);
        self
    }

    /// Acquirer with this fixture as primary price and sentiment source.
    pub fn into_acquirer(self) -> SignalAcquirer {
        let fixture = Arc::new(self);
        SignalAcquirer::new(
            fixture.clone(),
            Arc::new(FailingProvider),
            fixture,
            SymbolTable::default(),
            Duration::from_millis(500),
        )
    }
}

#[async_trait::async_trait]
impl PriceProvider for MarketFixture {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        self.prices
            .get(symbol)
            .cloned()
            .ok_or_else(|| OrchestrationError::Provider(format!("unknown symbol {}", symbol)))
    }
}

#[async_trait::async_trait]
impl SentimentProvider for MarketFixture {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch_sentiment(&self, company_name: &str) -> Result<f64> {
        self.sentiment
            .get(&company_name.to_lowercase())
            .copied()
            .ok_or_else(|| OrchestrationError::Provider(format!("no news for {}", company_name)))
    }
}
