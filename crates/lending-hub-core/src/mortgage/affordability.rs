//! Affordability estimate: the most house an income supports under the
//! front-end (28%) and back-end (36%) debt-to-income caps.
//!
//! The housing allowance is the smaller of the two caps, escrow is taken off
//! the top, and the remainder is run through the inverse annuity to find the
//! largest loan it services.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::{
    percent_of, require_non_negative, require_optional_non_negative, require_positive,
    require_term, AssumptionsEcho,
};
use crate::amortization::principal_from_payment;
use crate::assumptions::ProgramAssumptions;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const METHODOLOGY: &str = "Affordability (28/36 DTI with Inverse Amortization)";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub annual_income: Money,
    /// Existing monthly debt payments (car, student loans, cards).
    #[serde(default)]
    pub monthly_debts: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub interest_rate: Percent,
    pub loan_term: u32,
    /// Annual property tax. Defaults to 2,400.
    pub property_tax: Option<Money>,
    /// Annual homeowner's insurance. Defaults to 1,200.
    pub insurance: Option<Money>,
    /// Annual HOA dues. Defaults to 0.
    pub hoa: Option<Money>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub monthly_income: Money,
    /// Front-end cap on the housing payment.
    pub max_monthly_payment: Money,
    /// Back-end cap on housing plus other debts.
    pub max_total_debt: Money,
    /// min(front-end cap, back-end cap − debts). Negative when debts alone
    /// exceed the back-end cap.
    pub available_for_housing: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
    /// Housing allowance left for principal and interest (never below zero).
    pub available_for_pi: Money,
    pub max_loan_amount: Money,
    pub max_home_price: Money,
    pub down_payment_percent: Percent,
    pub pmi_required: bool,
    pub pmi: Money,
    /// P&I + escrow + PMI at the maximum loan.
    pub estimated_monthly_payment: Money,
    pub front_end_ratio: Percent,
    pub back_end_ratio: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> LendingResult<ComputationOutput<AffordabilityOutput>> {
    calculate_affordability_with(input, &ProgramAssumptions::default())
}

pub fn calculate_affordability_with(
    input: &AffordabilityInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    assumptions.validate()?;
    let (output, warnings) = compute(input, assumptions)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &AssumptionsEcho::new(input, assumptions),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub(crate) fn compute(
    input: &AffordabilityInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<(AffordabilityOutput, Vec<String>)> {
    validate(input)?;
    let mut warnings = Vec::new();
    let months = dec!(12);

    let monthly_income = input.annual_income / months;
    let max_monthly_payment = monthly_income * assumptions.front_end_dti;
    let max_total_debt = monthly_income * assumptions.back_end_dti;
    let available_for_housing = max_monthly_payment.min(max_total_debt - input.monthly_debts);

    let monthly_property_tax =
        input.property_tax.unwrap_or(assumptions.default_property_tax) / months;
    let monthly_insurance = input.insurance.unwrap_or(assumptions.default_insurance) / months;
    let monthly_hoa = input.hoa.unwrap_or(Decimal::ZERO) / months;
    let escrow = monthly_property_tax + monthly_insurance + monthly_hoa;

    let mut available_for_pi = available_for_housing - escrow;
    if available_for_housing <= Decimal::ZERO {
        warn!(
            monthly_debts = %input.monthly_debts,
            max_total_debt = %max_total_debt,
            "existing debts exhaust the back-end allowance"
        );
        warnings.push(format!(
            "Existing monthly debts of {} leave nothing under the {}% back-end limit",
            input.monthly_debts.round_dp(2),
            assumptions.back_end_dti * dec!(100)
        ));
        available_for_pi = Decimal::ZERO;
    } else if available_for_pi <= Decimal::ZERO {
        warnings.push(format!(
            "Taxes, insurance and HOA ({} per month) consume the entire housing allowance",
            escrow.round_dp(2)
        ));
        available_for_pi = Decimal::ZERO;
    }

    let max_loan_amount =
        principal_from_payment(available_for_pi, input.interest_rate, input.loan_term)?;
    let max_home_price = max_loan_amount + input.down_payment;
    let down_payment_percent = percent_of(input.down_payment, max_home_price)?;

    let pmi_required =
        max_loan_amount > Decimal::ZERO && down_payment_percent < assumptions.pmi_threshold_percent;
    let pmi = if pmi_required {
        max_loan_amount * assumptions.pmi_rate / months
    } else {
        Decimal::ZERO
    };

    let estimated_monthly_payment = available_for_pi + escrow + pmi;
    let front_end_ratio = percent_of(estimated_monthly_payment, monthly_income)?;
    let back_end_ratio =
        percent_of(estimated_monthly_payment + input.monthly_debts, monthly_income)?;

    debug!(
        monthly_income = %monthly_income,
        available_for_pi = %available_for_pi,
        max_loan_amount = %max_loan_amount,
        max_home_price = %max_home_price,
        "affordability computed"
    );

    Ok((
        AffordabilityOutput {
            monthly_income,
            max_monthly_payment,
            max_total_debt,
            available_for_housing,
            monthly_property_tax,
            monthly_insurance,
            monthly_hoa,
            available_for_pi,
            max_loan_amount,
            max_home_price,
            down_payment_percent,
            pmi_required,
            pmi,
            estimated_monthly_payment,
            front_end_ratio,
            back_end_ratio,
        },
        warnings,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &AffordabilityInput) -> LendingResult<()> {
    require_positive("annual_income", input.annual_income)?;
    require_non_negative("monthly_debts", input.monthly_debts)?;
    require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("interest_rate", input.interest_rate)?;
    require_term("loan_term", input.loan_term)?;
    require_optional_non_negative("property_tax", input.property_tax)?;
    require_optional_non_negative("insurance", input.insurance)?;
    require_optional_non_negative("hoa", input.hoa)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
