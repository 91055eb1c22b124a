use esg_agent_orchestrator::{
    config::PipelineConfig,
    models::{AnalysisRequest, UserRole},
    Orchestrator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let company_name = args.next().unwrap_or_default();
    if company_name.trim().is_empty() {
        eprintln!("usage: esg-analyze <company name> [role]");
        std::process::exit(2);
    }
    let user_role: UserRole = args
        .next()
        .map(|r| r.parse().unwrap_or_default())
        .unwrap_or_default();

    let config = PipelineConfig::from_env()?;
    let orchestrator = Orchestrator::from_config(&config)?;

    info!(company = %company_name, "ESG analysis starting");

    match orchestrator
        .analyze(AnalysisRequest {
            company_name,
            user_role,
        })
        .await
    {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Analysis failed [{}]: {}", e.code(), e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
