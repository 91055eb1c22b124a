//! Signal acquisition
//!
//! Fetches a stock price (primary source, one fallback hop) and a news
//! sentiment score for a company. Both calls run concurrently, each under
//! its own timeout. A single missing signal degrades the analysis; losing
//! both is the only hard stop.

use crate::config::PipelineConfig;
use crate::error::OrchestrationError;
use crate::models::{AcquisitionOutcome, SignalBundle};
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod providers;
pub mod symbols;

pub use providers::{AlphaVantageProvider, NewsApiProvider, YahooFinanceProvider};
pub use symbols::SymbolTable;

/// A price plus whatever recent daily closes the source returned (oldest first).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub historical_prices: Vec<f64>,
}

#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote>;
}

#[async_trait::async_trait]
pub trait SentimentProvider: Send + Sync {
    fn name(&self) -> &'static str;
    /// Sentiment in [0,1], 0.5 neutral.
    async fn fetch_sentiment(&self, company_name: &str) -> Result<f64>;
}

pub struct SignalAcquirer {
    primary_price: Arc<dyn PriceProvider>,
    secondary_price: Arc<dyn PriceProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    symbols: SymbolTable,
    call_timeout: Duration,
}

struct PriceAttempt {
    quote: Option<(PriceQuote, &'static str)>,
    failures: Vec<String>,
}

struct SentimentAttempt {
    sentiment: Option<(f64, &'static str)>,
    failure: Option<String>,
}

impl SignalAcquirer {
    pub fn new(
        primary_price: Arc<dyn PriceProvider>,
        secondary_price: Arc<dyn PriceProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        symbols: SymbolTable,
        call_timeout: Duration,
    ) -> Self {
        Self {
            primary_price,
            secondary_price,
            sentiment,
            symbols,
            call_timeout,
        }
    }

    /// Live Yahoo → Alpha Vantage price chain and NewsAPI sentiment.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let (yahoo, alpha_vantage, news) = providers::live_providers(config)?;

        Ok(Self::new(
            Arc::new(yahoo),
            Arc::new(alpha_vantage),
            Arc::new(news),
            SymbolTable::default(),
            config.provider_timeout,
        ))
    }

    /// Build the signal bundle for one company.
    ///
    /// Dropping the returned future cancels any provider call still in flight.
    pub async fn acquire(&self, company_name: &str) -> Result<(SignalBundle, AcquisitionOutcome)> {
        let start = Instant::now();
        let symbol = self.symbols.resolve(company_name);

        info!(company = %company_name, symbol = %symbol, "Acquiring market signals");

        let (price, sentiment) = tokio::join!(
            self.acquire_price(&symbol),
            self.acquire_sentiment(company_name)
        );

        let mut outcome = AcquisitionOutcome {
            failures: price.failures,
            ..AcquisitionOutcome::default()
        };
        outcome.failures.extend(sentiment.failure);

        if price.quote.is_none() && sentiment.sentiment.is_none() {
            warn!(
                company = %company_name,
                symbol = %symbol,
                failures = ?outcome.failures,
                "All signal sources failed"
            );
            return Err(OrchestrationError::CompanyNotFound(format!(
                "no price or news data available for '{}' (symbol {})",
                company_name, symbol
            )));
        }

        let (current_price, historical_prices) = match price.quote {
            Some((quote, source)) => {
                outcome.price_source = Some(source.to_string());
                (Some(quote.price), quote.historical_prices)
            }
            None => (None, Vec::new()),
        };

        let news_sentiment = sentiment.sentiment.map(|(value, source)| {
            outcome.sentiment_source = Some(source.to_string());
            value
        });

        let bundle = SignalBundle::new(
            company_name.to_string(),
            symbol,
            news_sentiment,
            current_price,
            historical_prices,
        );
        outcome.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            company = %bundle.company_name,
            data_quality = %bundle.data_quality,
            price_source = ?outcome.price_source,
            sentiment_source = ?outcome.sentiment_source,
            elapsed_ms = outcome.elapsed_ms,
            "Signal acquisition complete"
        );

        Ok((bundle, outcome))
    }

    async fn acquire_price(&self, symbol: &str) -> PriceAttempt {
        let mut failures = Vec::new();

        for provider in [&self.primary_price, &self.secondary_price] {
            let name = provider.name();
            let result = bounded(self.call_timeout, name, provider.fetch_price(symbol)).await;

            match result {
                Ok(quote) if quote.price.is_finite() && quote.price > 0.0 => {
                    debug!(provider = name, price = quote.price, "Price acquired");
                    return PriceAttempt {
                        quote: Some((quote, name)),
                        failures,
                    };
                }
                Ok(quote) => {
                    warn!(provider = name, price = quote.price, "Provider returned a non-positive price");
                    failures.push(format!("{}: non-positive price {}", name, quote.price));
                }
                Err(e) => {
                    warn!(provider = name, error = %e, "Price provider failed");
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }

        PriceAttempt {
            quote: None,
            failures,
        }
    }

    async fn acquire_sentiment(&self, company_name: &str) -> SentimentAttempt {
        let name = self.sentiment.name();
        let result = bounded(
            self.call_timeout,
            name,
            self.sentiment.fetch_sentiment(company_name),
        )
        .await;

        match result {
            Ok(value) if value.is_finite() => SentimentAttempt {
                sentiment: Some((value.clamp(0.0, 1.0), name)),
                failure: None,
            },
            Ok(value) => SentimentAttempt {
                sentiment: None,
                failure: Some(format!("{}: non-finite sentiment {}", name, value)),
            },
            Err(e) => {
                warn!(provider = name, error = %e, "Sentiment provider failed");
                SentimentAttempt {
                    sentiment: None,
                    failure: Some(format!("{}: {}", name, e)),
                }
            }
        }
    }
}

async fn bounded<T, F>(limit: Duration, provider: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, call).await.map_err(|_| {
        OrchestrationError::Provider(format!(
            "{} timed out after {} ms",
            provider,
            limit.as_millis()
        ))
    })?
}
