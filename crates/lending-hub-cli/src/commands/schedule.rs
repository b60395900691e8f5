use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_hub_core::schedule::{self, AmortizationScheduleInput};

use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Amount financed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sched_input: AmortizationScheduleInput =
        match input::read_structured(args.input.as_deref())? {
            Some(parsed) => parsed,
            None => AmortizationScheduleInput {
                loan_amount: args
                    .loan_amount
                    .ok_or("--loan-amount is required (or provide --input)")?,
                interest_rate: args
                    .interest_rate
                    .ok_or("--interest-rate is required (or provide --input)")?,
                loan_term: args.loan_term,
            },
        };
    let result = schedule::amortization_schedule(&sched_input)?;
    Ok(serde_json::to_value(result)?)
}
