//! CLI for running supplier discovery against live providers
//!
//! Prints results as JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use supplier_research::{
    ai::OpenAI, scrape_websites, AgentConfig, CompanyProfile, EnvConfig, ModelSpec,
    SupplierGraph, TavilyClient,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "supplier-search")]
#[command(about = "Find suppliers for a procurement requirement")]
struct Cli {
    /// Model in `provider/model` form (overrides SUPPLIER_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan queries, search and extract suppliers
    Search {
        #[arg(long)]
        company_name: String,
        #[arg(long)]
        company_info: String,
        #[arg(long)]
        requirement: String,
        /// Maximum branches in flight per stage
        #[arg(long)]
        max_concurrency: Option<usize>,
    },

    /// Extract suppliers from the given URLs, one at a time
    Scrape {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,supplier_research=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let env = EnvConfig::from_env()?;

    let mut config = AgentConfig::default();
    if let Some(model) = cli.model.or(env.model.clone()) {
        config = config.with_model(model);
    }

    let provider = TavilyClient::new(env.tavily_api_key.clone())
        .context("Failed to create Tavily client")?
        .with_search_depth(config.search_depth)
        .with_max_results(config.max_search_results);

    let mut model = OpenAI::new(env.openai_api_key.clone())
        .with_model_spec(&ModelSpec::parse(&config.model))
        .context("Unsupported model")?;
    if let Some(base_url) = &env.openai_base_url {
        model = model.with_base_url(base_url.as_str());
    }

    tracing::info!(model = %model.model(), "Starting supplier research");

    match cli.command {
        Commands::Search {
            company_name,
            company_info,
            requirement,
            max_concurrency,
        } => {
            if let Some(max) = max_concurrency {
                config = config.with_max_concurrency(max);
            }

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling run");
                    ctrl_c.cancel();
                }
            });

            let graph = SupplierGraph::new(provider, model).with_config(config);
            let output = graph
                .run_with_cancellation(
                    CompanyProfile::new(company_name, company_info, requirement),
                    cancel,
                )
                .await
                .context("Supplier research failed")?;

            println!("{}", serde_json::to_string_pretty(&output.suppliers)?);
        }
        Commands::Scrape { urls } => {
            let outcome = scrape_websites(&provider, &model, &config, &urls).await;

            for url in &outcome.directory_urls {
                tracing::info!(url = %url, "Skipped supplier directory");
            }

            println!("{}", serde_json::to_string_pretty(&outcome.suppliers)?);
        }
    }

    Ok(())
}
