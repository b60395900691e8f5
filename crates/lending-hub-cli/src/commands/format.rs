use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use lending_hub_core::format::{format_currency, format_currency_cents, format_percent};

#[derive(Debug, Clone, ValueEnum)]
pub enum FormatStyle {
    /// Whole dollars: $1,235
    Currency,
    /// Dollars and cents: $1,234.56
    Cents,
    /// Three-decimal percentage: 6.500%
    Percent,
}

/// Arguments for display formatting
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormatArgs {
    /// Value to format
    #[arg(long)]
    pub value: Decimal,

    /// Display style
    #[arg(long, default_value = "currency")]
    pub style: FormatStyle,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let formatted = match args.style {
        FormatStyle::Currency => format_currency(args.value),
        FormatStyle::Cents => format_currency_cents(args.value),
        FormatStyle::Percent => format_percent(args.value),
    };
    Ok(json!({ "formatted": formatted }))
}
