//! Mortgage calculators for the loan programs offered through the portal:
//! conventional, VA, FHA, refinance and affordability.
//!
//! Each calculator validates its input, runs on the shared amortization
//! primitives in [`crate::amortization`], and returns a
//! [`ComputationOutput`] envelope. [`calculate_mortgage`] dispatches a tagged
//! request (the shape form submissions arrive in) to the right calculator.

pub mod affordability;
pub mod conventional;
pub mod fha;
pub mod refinance;
pub mod va;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{check_term, MAX_INPUT_AMOUNT};
use crate::assumptions::ProgramAssumptions;
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LendingResult;

pub use affordability::{calculate_affordability, AffordabilityInput, AffordabilityOutput};
pub use conventional::{calculate_conventional, ConventionalInput, ConventionalOutput};
pub use fha::{calculate_fha, FhaInput, FhaOutput};
pub use refinance::{calculate_refinance, RefinanceInput, RefinanceOutput};
pub use va::{calculate_va, VaInput, VaOutput};

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// A calculator request tagged by program, e.g.
/// `{"calculator": "fha", "home_price": 300000, ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum MortgageCalculation {
    Conventional(ConventionalInput),
    Va(VaInput),
    Fha(FhaInput),
    Refinance(RefinanceInput),
    Affordability(AffordabilityInput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageOutput {
    Conventional(ConventionalOutput),
    Va(VaOutput),
    Fha(FhaOutput),
    Refinance(RefinanceOutput),
    Affordability(AffordabilityOutput),
}

/// Run whichever calculator the request names, with default assumptions.
pub fn calculate_mortgage(
    input: &MortgageCalculation,
) -> LendingResult<ComputationOutput<MortgageOutput>> {
    calculate_mortgage_with(input, &ProgramAssumptions::default())
}

pub fn calculate_mortgage_with(
    input: &MortgageCalculation,
    assumptions: &ProgramAssumptions,
) -> LendingResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    assumptions.validate()?;

    let (output, methodology, warnings) = match input {
        MortgageCalculation::Conventional(i) => {
            let (out, w) = conventional::compute(i, assumptions)?;
            (
                MortgageOutput::Conventional(out),
                conventional::METHODOLOGY,
                w,
            )
        }
        MortgageCalculation::Va(i) => {
            let (out, w) = va::compute(i, assumptions)?;
            (MortgageOutput::Va(out), va::METHODOLOGY, w)
        }
        MortgageCalculation::Fha(i) => {
            let (out, w) = fha::compute(i, assumptions)?;
            (MortgageOutput::Fha(out), fha::METHODOLOGY, w)
        }
        MortgageCalculation::Refinance(i) => {
            let (out, w) = refinance::compute(i)?;
            (MortgageOutput::Refinance(out), refinance::METHODOLOGY, w)
        }
        MortgageCalculation::Affordability(i) => {
            let (out, w) = affordability::compute(i, assumptions)?;
            (
                MortgageOutput::Affordability(out),
                affordability::METHODOLOGY,
                w,
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &AssumptionsEcho::new(input, assumptions),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Envelope `assumptions` echo: the request fields plus the program constants
/// the calculation ran with.
#[derive(Serialize)]
pub(crate) struct AssumptionsEcho<'a, T: Serialize> {
    #[serde(flatten)]
    request: &'a T,
    program_assumptions: &'a ProgramAssumptions,
}

impl<'a, T: Serialize> AssumptionsEcho<'a, T> {
    pub fn new(request: &'a T, program_assumptions: &'a ProgramAssumptions) -> Self {
        Self {
            request,
            program_assumptions,
        }
    }
}

/// Monthly escrow components added on top of principal and interest.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MonthlyEscrow {
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
}

impl MonthlyEscrow {
    /// Annual tax and insurance are spread over twelve months; HOA dues are
    /// already monthly.
    pub fn from_annual_tax_and_insurance(
        property_tax: Option<Money>,
        insurance: Option<Money>,
        hoa_monthly: Option<Money>,
    ) -> Self {
        Self {
            property_tax: property_tax.unwrap_or(Decimal::ZERO) / dec!(12),
            insurance: insurance.unwrap_or(Decimal::ZERO) / dec!(12),
            hoa: hoa_monthly.unwrap_or(Decimal::ZERO),
        }
    }

    pub fn total(&self) -> Money {
        self.property_tax + self.insurance + self.hoa
    }
}

/// Checks shared by the purchase calculators (conventional, VA, FHA).
pub(crate) fn validate_purchase(
    home_price: Money,
    down_payment: Money,
    interest_rate: Percent,
    loan_term: u32,
) -> LendingResult<()> {
    require_positive("home_price", home_price)?;
    require_non_negative("down_payment", down_payment)?;
    if down_payment > home_price {
        return Err(LendingError::invalid(
            "down_payment",
            "Down payment cannot exceed the home price",
        ));
    }
    require_non_negative("interest_rate", interest_rate)?;
    require_term("loan_term", loan_term)?;
    Ok(())
}

pub(crate) fn validate_escrow(
    property_tax: Option<Money>,
    insurance: Option<Money>,
    hoa: Option<Money>,
) -> LendingResult<()> {
    require_optional_non_negative("property_tax", property_tax)?;
    require_optional_non_negative("insurance", insurance)?;
    require_optional_non_negative("hoa", hoa)?;
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: Decimal) -> LendingResult<()> {
    if value <= Decimal::ZERO {
        return Err(LendingError::invalid(field, "Must be greater than zero"));
    }
    require_in_range(field, value)
}

pub(crate) fn require_non_negative(field: &str, value: Decimal) -> LendingResult<()> {
    if value < Decimal::ZERO {
        return Err(LendingError::invalid(field, "Cannot be negative"));
    }
    require_in_range(field, value)
}

fn require_in_range(field: &str, value: Decimal) -> LendingResult<()> {
    if value > MAX_INPUT_AMOUNT {
        return Err(LendingError::invalid(
            field,
            "Exceeds the supported maximum of 1,000,000,000,000,000",
        ));
    }
    Ok(())
}

pub(crate) fn require_optional_non_negative(
    field: &str,
    value: Option<Decimal>,
) -> LendingResult<()> {
    match value {
        Some(v) => require_non_negative(field, v),
        None => Ok(()),
    }
}

pub(crate) fn require_term(field: &str, loan_term: u32) -> LendingResult<()> {
    check_term(field, loan_term)
}

/// `part / whole × 100`, or zero when `whole` is zero.
pub(crate) fn percent_of(part: Money, whole: Money) -> LendingResult<Percent> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| LendingError::Overflow {
            context: "percentage ratio".into(),
        })
}
