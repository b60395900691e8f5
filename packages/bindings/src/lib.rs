use napi::Result as NapiResult;
use napi_derive::napi;

use lending_hub_core::ProgramAssumptions;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional assumptions document, falling back to program defaults.
fn parse_assumptions(assumptions_json: Option<String>) -> NapiResult<ProgramAssumptions> {
    let assumptions = match assumptions_json {
        Some(json) => serde_json::from_str::<ProgramAssumptions>(&json).map_err(to_napi_error)?,
        None => ProgramAssumptions::default(),
    };
    assumptions.validate().map_err(to_napi_error)?;
    Ok(assumptions)
}

// ---------------------------------------------------------------------------
// Purchase loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_conventional(
    input_json: String,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let input: lending_hub_core::mortgage::conventional::ConventionalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output =
        lending_hub_core::mortgage::conventional::calculate_conventional_with(&input, &assumptions)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_va(input_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let input: lending_hub_core::mortgage::va::VaInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output = lending_hub_core::mortgage::va::calculate_va_with(&input, &assumptions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_fha(input_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let input: lending_hub_core::mortgage::fha::FhaInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output = lending_hub_core::mortgage::fha::calculate_fha_with(&input, &assumptions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Refinance and affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_refinance(input_json: String) -> NapiResult<String> {
    let input: lending_hub_core::mortgage::refinance::RefinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_hub_core::mortgage::refinance::calculate_refinance(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_affordability(
    input_json: String,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let input: lending_hub_core::mortgage::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output = lending_hub_core::mortgage::affordability::calculate_affordability_with(
        &input,
        &assumptions,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run any calculator from a request tagged with `"calculator"`.
#[napi]
pub fn calculate_mortgage(
    input_json: String,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let input: lending_hub_core::mortgage::MortgageCalculation =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output = lending_hub_core::mortgage::calculate_mortgage_with(&input, &assumptions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: lending_hub_core::schedule::AmortizationScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_hub_core::schedule::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

fn parse_amount(value: &str) -> NapiResult<rust_decimal::Decimal> {
    value
        .trim()
        .parse::<rust_decimal::Decimal>()
        .map_err(to_napi_error)
}

#[napi]
pub fn format_currency(value: String) -> NapiResult<String> {
    Ok(lending_hub_core::format::format_currency(parse_amount(&value)?))
}

#[napi]
pub fn format_currency_cents(value: String) -> NapiResult<String> {
    Ok(lending_hub_core::format::format_currency_cents(
        parse_amount(&value)?,
    ))
}

#[napi]
pub fn format_percent(value: String) -> NapiResult<String> {
    Ok(lending_hub_core::format::format_percent(parse_amount(&value)?))
}
