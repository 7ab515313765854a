//! ZPricing command-line resolver
//!
//! Resolves the price and discount of one or more rate plans and prints
//! the result as JSON.
//!
//! ```sh
//! # Against the billing platform (needs ZPRICING__API__SESSION_TOKEN)
//! zpricing --currency EUR 2c92c0f9552e6022015530268f953190 2c92c0f8550f92e2015526a61cd65ad8
//!
//! # Against a local catalog fixture
//! zpricing --catalog catalog.json 2c92c0f9552e6022015530268f953190
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zpricing_core::{config::LoggingConfig, traits::QueryService, AppConfig};
use zpricing_query::{HttpQueryClient, InMemoryCatalog};
use zpricing_services::PriceDiscountResolver;

/// Resolve rate plan prices and discounts.
#[derive(Parser, Debug)]
#[command(name = "zpricing", version, about)]
struct Cli {
    /// Product rate plan ids, resolved in order
    #[arg(required = true)]
    rate_plans: Vec<String>,

    /// Currency code (defaults to pricing.default_currency)
    #[arg(short, long)]
    currency: Option<String>,

    /// Resolve against a JSON catalog file instead of the billing platform
    #[arg(long, env = "ZPRICING_CATALOG")]
    catalog: Option<PathBuf>,

    /// Configuration file (defaults to config/default and config/{RUN_MODE})
    #[arg(long)]
    config: Option<String>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

/// Initialize tracing/logging
fn init_tracing(logging: &LoggingConfig, override_level: Option<&str>) {
    let level = override_level.unwrap_or(logging.level.as_str());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "zpricing={},zpricing_core={},zpricing_query={},zpricing_services={},reqwest=warn",
            level, level, level, level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so stdout carries only the JSON result
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn query_source(cli: &Cli, config: &AppConfig) -> anyhow::Result<Arc<dyn QueryService>> {
    match &cli.catalog {
        Some(path) => {
            info!("Using catalog file {}", path.display());
            let catalog = InMemoryCatalog::from_json_file(path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            Ok(Arc::new(catalog))
        }
        None => {
            info!("Using billing platform at {}", config.api.base_url);
            let client = HttpQueryClient::from_config(&config.api)
                .context("creating billing platform query client")?;
            Ok(Arc::new(client))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("loading configuration")?;

    init_tracing(&config.logging, cli.log_level.as_deref());

    info!("Starting ZPricing v{}", env!("CARGO_PKG_VERSION"));

    let currency = cli
        .currency
        .clone()
        .unwrap_or_else(|| config.pricing.default_currency.clone());

    let resolver = PriceDiscountResolver::new(query_source(&cli, &config)?);

    match resolver.resolve_for(&currency, cli.rate_plans.iter().cloned()).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            error!(code = e.error_code(), "Resolution failed: {}", e);
            Err(e.into())
        }
    }
}
