//! VA purchase loan. The funding fee is financed into the loan and PMI is
//! never charged.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::{
    percent_of, require_optional_non_negative, validate_escrow, validate_purchase,
    AssumptionsEcho, MonthlyEscrow,
};
use crate::amortization::{amortized_payment, monthly_rate, number_of_payments};
use crate::assumptions::ProgramAssumptions;
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const METHODOLOGY: &str = "VA Mortgage (Financed Funding Fee, No PMI)";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaInput {
    pub home_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub interest_rate: Percent,
    pub loan_term: u32,
    /// Funding fee as a percent of the home price. Defaults to 2.3.
    pub funding_fee_percent: Option<Percent>,
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
pub struct VaOutput {
    /// Home price less down payment, before the funding fee.
    pub base_loan_amount: Money,
    pub funding_fee_percent: Percent,
    pub funding_fee: Money,
    /// Base loan plus the financed funding fee.
    pub loan_amount: Money,
    pub down_payment_percent: Percent,
    pub monthly_rate: Rate,
    pub number_of_payments: u32,
    pub principal_and_interest: Money,
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

pub fn calculate_va(input: &VaInput) -> LendingResult<ComputationOutput<VaOutput>> {
    calculate_va_with(input, &ProgramAssumptions::default())
}

pub fn calculate_va_with(
    input: &VaInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<ComputationOutput<VaOutput>> {
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
    input: &VaInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<(VaOutput, Vec<String>)> {
    validate_purchase(
        input.home_price,
        input.down_payment,
        input.interest_rate,
        input.loan_term,
    )?;
    validate_escrow(input.property_tax, input.insurance, input.hoa)?;
    require_optional_non_negative("funding_fee_percent", input.funding_fee_percent)?;

    let funding_fee_percent = input
        .funding_fee_percent
        .unwrap_or(assumptions.va_funding_fee_percent);
    if funding_fee_percent > dec!(100) {
        return Err(LendingError::invalid(
            "funding_fee_percent",
            "Funding fee cannot exceed 100% of the home price",
        ));
    }

    let mut warnings = Vec::new();
    if funding_fee_percent.is_zero() {
        warnings.push("Funding fee waived (e.g. service-connected disability exemption)".into());
    }

    let funding_fee = input.home_price * (funding_fee_percent / dec!(100));
    let base_loan = input.home_price - input.down_payment;
    let principal = base_loan + funding_fee;
    let n = number_of_payments(input.loan_term)?;
    let payments = Decimal::from(n);

    let monthly_pi = amortized_payment(principal, input.interest_rate, input.loan_term)?;
    let escrow =
        MonthlyEscrow::from_annual_tax_and_insurance(input.property_tax, input.insurance, input.hoa);
    let monthly_payment = monthly_pi + escrow.total();

    debug!(
        funding_fee = %funding_fee,
        loan_amount = %principal,
        monthly_payment = %monthly_payment,
        "va payment computed"
    );

    Ok((
        VaOutput {
            base_loan_amount: base_loan,
            funding_fee_percent,
            funding_fee,
            loan_amount: principal,
            down_payment_percent: percent_of(input.down_payment, input.home_price)?,
            monthly_rate: monthly_rate(input.interest_rate),
            number_of_payments: n,
            principal_and_interest: monthly_pi,
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

    fn standard_input() -> VaInput {
        VaInput {
            home_price: dec!(300_000),
            down_payment: Decimal::ZERO,
            interest_rate: dec!(6.0),
            loan_term: 30,
            funding_fee_percent: None,
            property_tax: Some(dec!(3600)),
            insurance: Some(dec!(1200)),
            hoa: None,
        }
    }

    #[test]
    fn test_default_funding_fee_financed() {
        let out = calculate_va(&standard_input()).unwrap().result;
        // 300k * 2.3% = 6,900
        assert_eq!(out.funding_fee, dec!(6900));
        assert_eq!(out.funding_fee_percent, dec!(2.3));
        assert_eq!(out.base_loan_amount, dec!(300_000));
        assert_eq!(out.loan_amount, dec!(306_900));
    }

    #[test]
    fn test_payment_is_pi_plus_escrow_only() {
        let out = calculate_va(&standard_input()).unwrap().result;
        assert_eq!(out.monthly_payment, out.principal_and_interest + dec!(400));
        // 306,900 at 6% / 30y ≈ 1840.02
        assert!((out.principal_and_interest - dec!(1840.02)).abs() < dec!(0.01));
    }

    #[test]
    fn test_no_pmi_regardless_of_down_payment() {
        for dp in [dec!(0), dec!(5_000), dec!(30_000), dec!(90_000)] {
            let mut input = standard_input();
            input.down_payment = dp;
            let result = calculate_va(&input).unwrap();
            let json = serde_json::to_value(&result.result).unwrap();
            assert!(json.get("pmi").is_none());
            let escrow = result.result.monthly_property_tax + result.result.monthly_insurance;
            assert_eq!(
                result.result.monthly_payment,
                result.result.principal_and_interest + escrow
            );
        }
    }

    #[test]
    fn test_custom_funding_fee() {
        let mut input = standard_input();
        input.down_payment = dec!(15_000);
        input.funding_fee_percent = Some(dec!(1.5));
        let out = calculate_va(&input).unwrap().result;
        assert_eq!(out.funding_fee, dec!(4500));
        assert_eq!(out.loan_amount, dec!(289_500));
        assert_eq!(out.down_payment_percent, dec!(5));
    }

    #[test]
    fn test_waived_funding_fee_warns() {
        let mut input = standard_input();
        input.funding_fee_percent = Some(Decimal::ZERO);
        let result = calculate_va(&input).unwrap();
        assert_eq!(result.result.loan_amount, dec!(300_000));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_negative_funding_fee_rejected() {
        let mut input = standard_input();
        input.funding_fee_percent = Some(dec!(-2));
        let err = calculate_va(&input).unwrap_err();
        assert_eq!(err.field(), Some("funding_fee_percent"));
    }

    #[test]
    fn test_default_down_payment_when_omitted() {
        let input: VaInput = serde_json::from_str(
            r#"{"home_price": "250000", "interest_rate": "5.75", "loan_term": 30}"#,
        )
        .unwrap();
        assert_eq!(input.down_payment, Decimal::ZERO);
        assert!(calculate_va(&input).is_ok());
    }
}
