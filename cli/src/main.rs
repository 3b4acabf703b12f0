//! zCurve CLI - Quote, calibrate and chart bonding-curve sales
//!
//! Runs the off-chain zCurve pricing engine against a sale configuration
//! (preset, TOML file, or flags) with the same integer arithmetic the
//! settlement contract uses.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod analysis;
mod config;
mod quote;
mod units;

use config::{SaleConfig, SaleSettings};

#[derive(Parser)]
#[command(name = "zcurve")]
#[command(about = "zCurve pricing engine - quotes, calibration and curve analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// Built-in sale to start from (reference, none)
    #[arg(short, long, default_value = "reference")]
    preset: String,

    /// TOML file with sale_cap, quad_cap, divisor / target_raised
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sale cap in whole tokens (decimals allowed)
    #[arg(long)]
    sale_cap: Option<String>,

    /// Quantity where pricing turns linear, in whole tokens
    #[arg(long)]
    quad_cap: Option<String>,

    /// Raw divisor (overrides calibration)
    #[arg(long)]
    divisor: Option<String>,

    /// Amount a full sale should raise; calibrates the divisor
    #[arg(long)]
    target: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show resolved curve parameters
    Params,

    /// Cost to buy an exact number of tokens
    Quote {
        /// Tokens to buy
        amount: String,

        /// Tokens already sold
        #[arg(long, default_value = "0")]
        sold: String,
    },

    /// Tokens obtainable for a payment
    Buy {
        /// Payment amount
        payment: String,

        /// Tokens already sold
        #[arg(long, default_value = "0")]
        sold: String,
    },

    /// Refund for selling tokens back
    Sell {
        /// Tokens to sell
        amount: String,

        /// Tokens already sold
        #[arg(long)]
        sold: String,
    },

    /// Evenly spaced samples of the curve
    Sample {
        /// Number of intervals (points + 1 samples)
        #[arg(short = 'n', long, default_value = "20")]
        points: usize,
    },

    /// Compare calibrations for several fundraising targets
    Scenarios {
        /// Targets to compare
        #[arg(required = true)]
        targets: Vec<String>,

        /// Payment used for the "tokens bought" column
        #[arg(long, default_value = "0.01")]
        reference_payment: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let overrides = SaleSettings {
        sale_cap: cli.sale_cap.clone(),
        quad_cap: cli.quad_cap.clone(),
        divisor: cli.divisor.clone(),
        target_raised: cli.target.clone(),
    };
    let config = SaleConfig::new(&cli.preset, cli.config.clone(), overrides)?;

    if cli.verbose && !cli.json {
        println!("{} {}", "Preset:".bright_cyan(), config.preset);
        if let Some(path) = &config.config_path {
            println!("{} {}", "Config:".bright_cyan(), path.display());
        }
        println!("{} {}", "Divisor:".bright_cyan(), config.params.divisor());
    }

    match cli.command {
        Commands::Params => {
            quote::show_params(&config, cli.json)?;
        }
        Commands::Quote { amount, sold } => {
            quote::quote_cost(&config, &amount, &sold, cli.json)?;
        }
        Commands::Buy { payment, sold } => {
            quote::quote_tokens(&config, &payment, &sold, cli.json)?;
        }
        Commands::Sell { amount, sold } => {
            quote::quote_refund(&config, &amount, &sold, cli.json)?;
        }
        Commands::Sample { points } => {
            analysis::show_sample(&config, points, cli.json)?;
        }
        Commands::Scenarios { targets, reference_payment } => {
            analysis::show_scenarios(&config, &targets, &reference_payment, cli.json)?;
        }
    }

    Ok(())
}
