mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use loan_afford_core::affordability::{AffordabilityClassifier, AffordabilityThresholds};

use commands::loan::{AffordabilityArgs, EmiArgs};
use commands::report::ReportArgs;
use commands::scenarios::ScenariosArgs;
use commands::stress::StressArgs;

/// Loan affordability and repayment risk analysis
#[derive(Parser)]
#[command(
    name = "afford",
    version,
    about = "Loan affordability and repayment risk analysis",
    long_about = "A CLI for pricing fixed-rate loans and judging whether a borrower can \
                  carry them, with decimal precision. Supports installment calculation, \
                  affordability classification, tenure comparison, and rate-shock stress tests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file overriding the default affordability thresholds
    #[arg(long, global = true)]
    thresholds: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly installment (EMI) for a loan
    Emi(EmiArgs),
    /// Classify an installment against a borrower's budget
    Affordability(AffordabilityArgs),
    /// Compare tenure options and recommend one
    Scenarios(ScenariosArgs),
    /// Re-price the loan under interest rate shocks
    Stress(StressArgs),
    /// Run every analysis for one borrower and loan request
    Report(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("loan_afford_core={level},afford={level}", level = log_level).into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_classifier(
    path: Option<&str>,
) -> Result<AffordabilityClassifier, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let thresholds: AffordabilityThresholds = input::file::read_input(path)?;
            tracing::debug!(?thresholds, path, "loaded threshold overrides");
            Ok(AffordabilityClassifier::new(thresholds)?)
        }
        None => Ok(AffordabilityClassifier::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let thresholds = cli.thresholds.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args),
        Commands::Affordability(args) => load_classifier(thresholds)
            .and_then(|classifier| commands::loan::run_affordability(args, &classifier)),
        Commands::Scenarios(args) => load_classifier(thresholds)
            .and_then(|classifier| commands::scenarios::run_scenarios(args, &classifier)),
        Commands::Stress(args) => load_classifier(thresholds)
            .and_then(|classifier| commands::stress::run_stress(args, &classifier)),
        Commands::Report(args) => load_classifier(thresholds)
            .and_then(|classifier| commands::report::run_report(args, &classifier)),
        Commands::Version => {
            println!("afford {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
