mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::format::FormatArgs;
use commands::mortgage::{
    AffordabilityArgs, CalculateArgs, ConventionalArgs, FhaArgs, RefinanceArgs, VaArgs,
};
use commands::schedule::ScheduleArgs;

/// Mortgage payment, refinance and affordability calculations
#[derive(Parser)]
#[command(
    name = "lrh",
    version,
    about = "Mortgage payment, refinance and affordability calculations",
    long_about = "A CLI for the Lending Resource Hub mortgage calculators with decimal \
                  precision. Supports conventional, VA and FHA purchase loans, refinance \
                  break-even analysis, affordability limits and amortization schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file overriding loan-program assumptions (PMI rate, DTI caps, ...)
    #[arg(long, global = true)]
    assumptions: Option<String>,

    /// Log calculator internals to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Conventional purchase loan payment (with PMI under 20% down)
    Conventional(ConventionalArgs),
    /// VA purchase loan payment (financed funding fee, no PMI)
    Va(VaArgs),
    /// FHA purchase loan payment (upfront and monthly MIP)
    Fha(FhaArgs),
    /// Refinance savings and break-even analysis
    Refinance(RefinanceArgs),
    /// Maximum affordable home price from income and debts
    Affordability(AffordabilityArgs),
    /// Year-by-year amortization schedule
    Schedule(ScheduleArgs),
    /// Run any calculator from a tagged JSON request ({"calculator": "fha", ...})
    Calculate(CalculateArgs),
    /// Format an amount as currency or a percentage
    Format(FormatArgs),
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
    telemetry::init(cli.verbose);

    let assumptions = match config::load_assumptions(cli.assumptions.as_deref()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Conventional(args) => commands::mortgage::run_conventional(args, &assumptions),
        Commands::Va(args) => commands::mortgage::run_va(args, &assumptions),
        Commands::Fha(args) => commands::mortgage::run_fha(args, &assumptions),
        Commands::Refinance(args) => commands::mortgage::run_refinance(args),
        Commands::Affordability(args) => commands::mortgage::run_affordability(args, &assumptions),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Calculate(args) => commands::mortgage::run_calculate(args, &assumptions),
        Commands::Format(args) => commands::format::run_format(args),
        Commands::Version => {
            println!("lrh {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
