mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::checks::ChecksArgs;
use commands::solver::SolveArgs;
use commands::valuation::{ProjectArgs, ValueArgs, WaccArgs};

/// FCFF DCF valuation toolkit
#[derive(Parser)]
#[command(
    name = "dcf",
    version,
    about = "FCFF DCF valuation toolkit",
    long_about = "Discounted cash flow valuation with decimal precision: WACC, \
                  year-by-year FCFF projection, terminal value, equity bridge, \
                  reverse solving for implied assumptions, and an invariant \
                  diagnostic report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Weighted average cost of capital for an assumptions record
    Wacc(WaccArgs),
    /// Project the year-by-year revenue / FCFF schedule
    Project(ProjectArgs),
    /// Full valuation: projection PV, terminal value, equity bridge, per-share
    Value(ValueArgs),
    /// Reverse-solve one assumption to reproduce a target price
    Solve(SolveArgs),
    /// Run the invariant diagnostic checks against a valuation
    Checks(ChecksArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Wacc(args) => commands::valuation::run_wacc(args),
        Commands::Project(args) => commands::valuation::run_project(args),
        Commands::Value(args) => commands::valuation::run_value(args),
        Commands::Solve(args) => commands::solver::run_solve(args),
        Commands::Checks(args) => commands::checks::run_checks(args),
        Commands::Version => {
            println!("dcf {}", env!("CARGO_PKG_VERSION"));
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
