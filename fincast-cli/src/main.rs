use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fincast_core::{
    RecommendationRequest, category_totals, fit_models, monthly_totals, recommend, trimmed_limits,
};
use fincast_ingest::parse_transactions_csv;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fincast",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINCAST_BUILD_SHA"), ")"),
    about = "Budget recommendations from transaction history"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the recommendation pipeline on a JSON request payload
    Recommend {
        /// Path to the request payload (JSON)
        #[arg(long)]
        payload: PathBuf,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Aggregate a transactions CSV and print per-category forecasts
    Forecast {
        /// Path to a transactions CSV (Date, Amount, Category columns)
        #[arg(long)]
        csv: PathBuf,

        /// Limit number of categories printed (default: 20)
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Recommend { payload, pretty } => run_recommend(&payload, pretty),
        Command::Forecast { csv, limit } => run_forecast(&csv, limit),
    }
}

fn run_recommend(path: &PathBuf, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let request: RecommendationRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing payload {}", path.display()))?;

    let response = recommend(&request)?;

    let out = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{out}");
    Ok(())
}

fn run_forecast(path: &PathBuf, limit: usize) -> Result<()> {
    let txns = parse_transactions_csv(path)?;
    let aggregates = monthly_totals(&txns);
    let models = fit_models(&aggregates);
    let totals = category_totals(&aggregates);

    println!(
        "{} transactions, {} monthly aggregates, {} fitted models",
        txns.len(),
        aggregates.len(),
        models.len()
    );

    for suggestion in trimmed_limits(&totals).iter().take(limit) {
        let next = match models.get(&suggestion.category) {
            Some(model) => format!("{:>10.2}", model.predict_next(model.next_calendar_month())),
            None => format!("{:>10}", "-"),
        };
        println!(
            "{:<24} total {:>10.2}  next {}  trim {:>10.2}",
            suggestion.category,
            totals.get(&suggestion.category).copied().unwrap_or(0.0),
            next,
            suggestion.recommended_limit
        );
    }
    Ok(())
}
