//! Financial document advisory CLI
//!
//! Run with: cargo run --bin finadvisor -- --file data/sample.pdf --query "..."

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finadvisor::pipeline::Pipeline;
use finadvisor::providers::{GeminiClient, LlmProvider, SerperClient};
use finadvisor::{AdvisorConfig, AnalysisRequest, StageKind};

#[derive(Parser, Debug)]
#[command(name = "finadvisor", version, about = "Analyze a financial document and produce an investment advisory report")]
struct Cli {
    /// Path to the financial document (PDF)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// What you want to know about the document
    #[arg(long, short, default_value = "Analyze this financial document for investment insights")]
    query: String,

    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Stop the run when the verifier rejects the document
    #[arg(long)]
    halt_on_rejection: bool,

    /// Print intermediate stage outputs, not just the final advisory
    #[arg(long)]
    show_stages: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finadvisor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AdvisorConfig::load(path)?,
        None => AdvisorConfig::from_env(),
    };
    if cli.halt_on_rejection {
        config.pipeline.halt_on_rejection = true;
    }

    let file_path = cli
        .file
        .unwrap_or_else(|| config.pipeline.default_document.clone());

    let llm = Arc::new(GeminiClient::new(&config.llm)?);
    tracing::info!("LLM: {} ({})", llm.name(), llm.model());
    if !llm.health_check().await.unwrap_or(false) {
        tracing::warn!("LLM endpoint not reachable; the run will likely fail");
    }

    let mut pipeline = Pipeline::new(llm, config.pipeline.clone());
    match SerperClient::new(&config.search) {
        Ok(search) => {
            tracing::info!("web search enabled");
            pipeline = pipeline.with_search(Arc::new(search));
        }
        Err(e) => {
            tracing::info!("web search disabled: {}", e);
        }
    }

    let request = AnalysisRequest::new(file_path, cli.query);
    let run = pipeline.run(&request).await?;

    if cli.show_stages {
        for kind in [StageKind::Verification, StageKind::Analysis, StageKind::RiskAssessment] {
            if let Some(output) = run.output(kind) {
                println!("=== {} ({}) ===\n{}\n", kind, output.role, output.text);
            }
        }
    }

    match run.report() {
        Some(report) => println!("=== Advisory Report ===\n{}", report),
        None => println!("Run halted before the advisory stage (document rejected)."),
    }

    Ok(())
}
