//! Refinance comparison: new payment on the current balance plus financed
//! closing costs, monthly and lifetime savings, break-even month and LTV.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::{
    percent_of, require_non_negative, require_optional_non_negative, require_positive,
    require_term,
};
use crate::amortization::{amortized_payment, monthly_rate, number_of_payments};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const METHODOLOGY: &str = "Refinance Analysis (Break-Even and Lifetime Savings)";

/// Loan-to-value above which most lenders require mortgage insurance.
const LTV_INSURANCE_THRESHOLD: Decimal = dec!(80);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub current_loan_balance: Money,
    pub home_value: Money,
    /// Rate on the existing loan, for comparison only.
    pub current_interest_rate: Option<Percent>,
    /// Existing monthly principal and interest payment.
    pub current_payment: Money,
    pub new_interest_rate: Percent,
    /// New term in years.
    pub new_loan_term: u32,
    /// Closing costs, financed into the new loan.
    pub closing_costs: Option<Money>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceOutput {
    /// Current balance plus financed closing costs.
    pub loan_amount: Money,
    pub closing_costs: Money,
    pub monthly_rate: Rate,
    pub number_of_payments: u32,
    pub current_payment: Money,
    pub new_monthly_payment: Money,
    /// Current minus new payment; negative when the refinance costs more per month.
    pub monthly_savings: Money,
    /// Months of savings needed to recover closing costs. `None` when the
    /// monthly payment does not change, so closing costs are never recovered.
    pub break_even_months: Option<u32>,
    pub lifetime_savings: Money,
    pub total_interest: Money,
    pub ltv_ratio: Percent,
    /// Current rate minus new rate, when the current rate was supplied.
    pub rate_reduction: Option<Percent>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_refinance(
    input: &RefinanceInput,
) -> LendingResult<ComputationOutput<RefinanceOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(METHODOLOGY, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub(crate) fn compute(input: &RefinanceInput) -> LendingResult<(RefinanceOutput, Vec<String>)> {
    validate(input)?;
    let mut warnings = Vec::new();

    let closing_costs = input.closing_costs.unwrap_or(Decimal::ZERO);
    let principal = input.current_loan_balance + closing_costs;
    let n = number_of_payments(input.new_loan_term)?;
    let payments = Decimal::from(n);

    let new_payment = amortized_payment(principal, input.new_interest_rate, input.new_loan_term)?;
    let monthly_savings = input.current_payment - new_payment;

    let break_even_months = break_even(closing_costs, monthly_savings);
    if break_even_months.is_none() {
        warn!(
            closing_costs = %closing_costs,
            "refinance leaves the monthly payment unchanged; closing costs never recovered"
        );
        warnings.push(
            "Monthly payment is unchanged; closing costs are never recovered".into(),
        );
    }
    if let Some(months) = break_even_months.filter(|&m| m > n) {
        debug!(break_even_months = months, "break-even falls beyond the new term");
        warnings.push(format!(
            "Closing costs are not recovered within the {n}-month term"
        ));
    }
    if monthly_savings < Decimal::ZERO {
        warnings.push(format!(
            "New payment exceeds the current payment by {} per month",
            (-monthly_savings).round_dp(2)
        ));
    }

    let ltv_ratio = percent_of(input.current_loan_balance, input.home_value)?;
    if ltv_ratio > LTV_INSURANCE_THRESHOLD {
        warnings.push(format!(
            "LTV of {}% exceeds {}%; mortgage insurance is likely required",
            ltv_ratio.round_dp(2),
            LTV_INSURANCE_THRESHOLD
        ));
    }

    debug!(
        loan_amount = %principal,
        new_payment = %new_payment,
        monthly_savings = %monthly_savings,
        "refinance computed"
    );

    Ok((
        RefinanceOutput {
            loan_amount: principal,
            closing_costs,
            monthly_rate: monthly_rate(input.new_interest_rate),
            number_of_payments: n,
            current_payment: input.current_payment,
            new_monthly_payment: new_payment,
            monthly_savings,
            break_even_months,
            lifetime_savings: input.current_payment * payments - new_payment * payments,
            total_interest: new_payment * payments - principal,
            ltv_ratio,
            rate_reduction: input
                .current_interest_rate
                .map(|current| current - input.new_interest_rate),
        },
        warnings,
    ))
}

/// `ceil(closing_costs / |monthly_savings|)`; zero when there is nothing to
/// recover and `None` when savings are zero. Saturates at `u32::MAX` when the
/// savings are too small for the month count to fit.
fn break_even(closing_costs: Money, monthly_savings: Money) -> Option<u32> {
    if closing_costs <= Decimal::ZERO {
        return Some(0);
    }
    if monthly_savings.is_zero() {
        return None;
    }
    let months = closing_costs
        .checked_div(monthly_savings.abs())
        .and_then(|months| months.ceil().to_u32())
        .unwrap_or(u32::MAX);
    Some(months)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &RefinanceInput) -> LendingResult<()> {
    require_positive("current_loan_balance", input.current_loan_balance)?;
    require_positive("home_value", input.home_value)?;
    require_optional_non_negative("current_interest_rate", input.current_interest_rate)?;
    require_non_negative("current_payment", input.current_payment)?;
    require_non_negative("new_interest_rate", input.new_interest_rate)?;
    require_term("new_loan_term", input.new_loan_term)?;
    require_optional_non_negative("closing_costs", input.closing_costs)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
