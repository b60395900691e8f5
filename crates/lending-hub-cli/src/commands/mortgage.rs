use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_hub_core::mortgage::affordability::{self, AffordabilityInput};
use lending_hub_core::mortgage::conventional::{self, ConventionalInput};
use lending_hub_core::mortgage::fha::{self, FhaInput};
use lending_hub_core::mortgage::refinance::{self, RefinanceInput};
use lending_hub_core::mortgage::va::{self, VaInput};
use lending_hub_core::mortgage::{self, MortgageCalculation};
use lending_hub_core::ProgramAssumptions;

use crate::input;

/// Arguments shared by the purchase calculators
#[derive(Args)]
pub struct PurchaseArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Cash down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term: u32,

    /// Annual property tax
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Annual homeowner's insurance
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a conventional loan
#[derive(Args)]
pub struct ConventionalArgs {
    #[command(flatten)]
    pub purchase: PurchaseArgs,
}

/// Arguments for a VA loan
#[derive(Args)]
pub struct VaArgs {
    #[command(flatten)]
    pub purchase: PurchaseArgs,

    /// Funding fee in percent of the home price (default 2.3)
    #[arg(long)]
    pub funding_fee_percent: Option<Decimal>,
}

/// Arguments for an FHA loan
#[derive(Args)]
pub struct FhaArgs {
    #[command(flatten)]
    pub purchase: PurchaseArgs,
}

/// Arguments for refinance analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RefinanceArgs {
    /// Outstanding balance on the current loan
    #[arg(long)]
    pub current_loan_balance: Option<Decimal>,

    /// Appraised home value
    #[arg(long)]
    pub home_value: Option<Decimal>,

    /// Current interest rate in percent
    #[arg(long)]
    pub current_interest_rate: Option<Decimal>,

    /// Current monthly principal and interest payment
    #[arg(long)]
    pub current_payment: Option<Decimal>,

    /// New interest rate in percent
    #[arg(long)]
    pub new_interest_rate: Option<Decimal>,

    /// New loan term in years
    #[arg(long, default_value = "30")]
    pub new_loan_term: u32,

    /// Closing costs financed into the new loan
    #[arg(long)]
    pub closing_costs: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for affordability
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Gross annual household income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long, default_value = "0")]
    pub monthly_debts: Decimal,

    /// Cash available for the down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term: u32,

    /// Annual property tax (default 2400)
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Annual homeowner's insurance (default 1200)
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Annual HOA dues
    #[arg(long)]
    pub hoa: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a tagged calculator request
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON request with a "calculator" tag
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_conventional(
    args: ConventionalArgs,
    assumptions: &ProgramAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let p = args.purchase;
    let conv_input: ConventionalInput = match input::read_structured(p.input.as_deref())? {
        Some(parsed) => parsed,
        None => ConventionalInput {
            home_price: p
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: p.down_payment,
            interest_rate: p
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term: p.loan_term,
            property_tax: p.property_tax,
            insurance: p.insurance,
            hoa: p.hoa,
        },
    };
    let result = conventional::calculate_conventional_with(&conv_input, assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_va(
    args: VaArgs,
    assumptions: &ProgramAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let p = args.purchase;
    let va_input: VaInput = match input::read_structured(p.input.as_deref())? {
        Some(parsed) => parsed,
        None => VaInput {
            home_price: p
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: p.down_payment,
            interest_rate: p
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term: p.loan_term,
            funding_fee_percent: args.funding_fee_percent,
            property_tax: p.property_tax,
            insurance: p.insurance,
            hoa: p.hoa,
        },
    };
    let result = va::calculate_va_with(&va_input, assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fha(
    args: FhaArgs,
    assumptions: &ProgramAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let p = args.purchase;
    let fha_input: FhaInput = match input::read_structured(p.input.as_deref())? {
        Some(parsed) => parsed,
        None => FhaInput {
            home_price: p
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: p.down_payment,
            interest_rate: p
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term: p.loan_term,
            property_tax: p.property_tax,
            insurance: p.insurance,
            hoa: p.hoa,
        },
    };
    let result = fha::calculate_fha_with(&fha_input, assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => RefinanceInput {
            current_loan_balance: args
                .current_loan_balance
                .ok_or("--current-loan-balance is required (or provide --input)")?,
            home_value: args
                .home_value
                .ok_or("--home-value is required (or provide --input)")?,
            current_interest_rate: args.current_interest_rate,
            current_payment: args
                .current_payment
                .ok_or("--current-payment is required (or provide --input)")?,
            new_interest_rate: args
                .new_interest_rate
                .ok_or("--new-interest-rate is required (or provide --input)")?,
            new_loan_term: args.new_loan_term,
            closing_costs: args.closing_costs,
        },
    };
    let result = refinance::calculate_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_affordability(
    args: AffordabilityArgs,
    assumptions: &ProgramAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let aff_input: AffordabilityInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => AffordabilityInput {
            annual_income: args
                .annual_income
                .ok_or("--annual-income is required (or provide --input)")?,
            monthly_debts: args.monthly_debts,
            down_payment: args.down_payment,
            interest_rate: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term: args.loan_term,
            property_tax: args.property_tax,
            insurance: args.insurance,
            hoa: args.hoa,
        },
    };
    let result = affordability::calculate_affordability_with(&aff_input, assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_calculate(
    args: CalculateArgs,
    assumptions: &ProgramAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: MortgageCalculation = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for a tagged calculation")?;
    let result = mortgage::calculate_mortgage_with(&request, assumptions)?;
    Ok(serde_json::to_value(result)?)
}
