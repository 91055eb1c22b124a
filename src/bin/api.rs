use esg_agent_orchestrator::{api::start_server, config::PipelineConfig, Orchestrator};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig::from_env()?;

    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY not set; analyses will run without news sentiment");
    }
    if config.alpha_vantage_key.is_none() {
        warn!("ALPHA_VANTAGE_KEY not set; no fallback price source");
    }

    info!(
        port = config.port,
        provider_timeout_secs = config.provider_timeout.as_secs(),
        "ESG Agent Orchestrator - API Server"
    );

    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);

    info!("Orchestrator initialized");

    start_server(orchestrator, config.port).await?;

    Ok(())
}
