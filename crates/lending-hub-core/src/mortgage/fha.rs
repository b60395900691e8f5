//! FHA purchase loan with upfront and annual mortgage insurance premiums.
//!
//! The upfront MIP is financed, so the annuity runs on `base_loan +
//! upfront_mip`. The monthly MIP is charged on the base loan only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::{
    percent_of, validate_escrow, validate_purchase, AssumptionsEcho, MonthlyEscrow,
};
use crate::amortization::{amortized_payment, monthly_rate, number_of_payments};
use crate::assumptions::ProgramAssumptions;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const METHODOLOGY: &str = "FHA Mortgage (Upfront and Annual MIP)";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhaInput {
    pub home_price: Money,
    pub down_payment: Money,
    pub interest_rate: Percent,
    pub loan_term: u32,
    /// Annual property tax.
    pub property_tax: Option<Money>,
    /// Annual homeowner's insurance.
    pub insurance: Option<Money>,
    /// Monthly HOA dues.
    pub hoa: Option<Money>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FhaOutput {
    pub base_loan_amount: Money,
    pub upfront_mip: Money,
    /// Base loan plus the financed upfront MIP.
    pub loan_amount: Money,
    pub down_payment_percent: Percent,
    pub monthly_rate: Rate,
    pub number_of_payments: u32,
    pub principal_and_interest: Money,
    pub monthly_mip: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_fha(input: &FhaInput) -> LendingResult<ComputationOutput<FhaOutput>> {
    calculate_fha_with(input, &ProgramAssumptions::default())
}

pub fn calculate_fha_with(
    input: &FhaInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<ComputationOutput<FhaOutput>> {
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
    input: &FhaInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<(FhaOutput, Vec<String>)> {
    validate_purchase(
        input.home_price,
        input.down_payment,
        input.interest_rate,
        input.loan_term,
    )?;
    validate_escrow(input.property_tax, input.insurance, input.hoa)?;

    let mut warnings = Vec::new();
    let down_payment_percent = percent_of(input.down_payment, input.home_price)?;
    if down_payment_percent < assumptions.fha_min_down_payment_percent {
        warnings.push(format!(
            "Down payment of {}% is below the FHA minimum of {}%",
            down_payment_percent.round_dp(2),
            assumptions.fha_min_down_payment_percent
        ));
    }

    let upfront_mip = input.home_price * assumptions.fha_upfront_mip_rate;
    let base_loan = input.home_price - input.down_payment;
    let principal = base_loan + upfront_mip;
    let n = number_of_payments(input.loan_term)?;
    let payments = Decimal::from(n);

    let monthly_pi = amortized_payment(principal, input.interest_rate, input.loan_term)?;
    let monthly_mip = base_loan * assumptions.fha_annual_mip_rate / Decimal::from(12);
    let escrow =
        MonthlyEscrow::from_annual_tax_and_insurance(input.property_tax, input.insurance, input.hoa);
    let monthly_payment = monthly_pi + monthly_mip + escrow.total();

    debug!(
        upfront_mip = %upfront_mip,
        monthly_mip = %monthly_mip,
        loan_amount = %principal,
        monthly_payment = %monthly_payment,
        "fha payment computed"
    );

    Ok((
        FhaOutput {
            base_loan_amount: base_loan,
            upfront_mip,
            loan_amount: principal,
            down_payment_percent,
            monthly_rate: monthly_rate(input.interest_rate),
            number_of_payments: n,
            principal_and_interest: monthly_pi,
            monthly_mip,
            monthly_property_tax: escrow.property_tax,
            monthly_insurance: escrow.insurance,
            monthly_hoa: escrow.hoa,
            monthly_payment,
            total_interest: monthly_pi * payments - principal,
            total_paid: monthly_payment * payments,
        },
        warnings,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_input() -> FhaInput {
        FhaInput {
            home_price: dec!(300_000),
            down_payment: dec!(10_500),
            interest_rate: dec!(6.25),
            loan_term: 30,
            property_tax: Some(dec!(3600)),
            insurance: Some(dec!(1200)),
            hoa: None,
        }
    }

    #[test]
    fn test_upfront_mip_financed() {
        let out = calculate_fha(&standard_input()).unwrap().result;
        // 300k * 1.75% = 5,250
        assert_eq!(out.upfront_mip, dec!(5250));
        assert_eq!(out.base_loan_amount, dec!(289_500));
        assert_eq!(out.loan_amount, dec!(294_750));
    }

    #[test]
    fn test_monthly_mip_on_base_loan_not_principal() {
        let out = calculate_fha(&standard_input()).unwrap().result;
        // 289,500 * 0.85% / 12 = 205.0625
        assert_eq!(out.monthly_mip, dec!(205.0625));
        let on_principal = out.loan_amount * dec!(0.0085) / dec!(12);
        assert_ne!(out.monthly_mip, on_principal);
        assert!(out.monthly_mip < on_principal);
    }

    #[test]
    fn test_monthly_payment_components() {
        let out = calculate_fha(&standard_input()).unwrap().result;
        assert_eq!(
            out.monthly_payment,
            out.principal_and_interest + out.monthly_mip + dec!(400)
        );
        // 294,750 at 6.25% / 30y ≈ 1814.82
        assert!((out.principal_and_interest - dec!(1814.82)).abs() < dec!(0.01));
    }

    #[test]
    fn test_minimum_down_payment_warning() {
        let result = calculate_fha(&standard_input()).unwrap();
        assert!(result.warnings.is_empty());

        let mut input = standard_input();
        input.down_payment = dec!(5_000);
        let result = calculate_fha(&input).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("FHA minimum"));
    }

    #[test]
    fn test_down_payment_above_price_rejected() {
        let mut input = standard_input();
        input.down_payment = dec!(300_001);
        assert!(calculate_fha(&input).is_err());
    }
}
