//! Conventional purchase loan: level-pay amortization plus PMI when the
//! down payment is under the threshold (20% by default).

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

pub(crate) const METHODOLOGY: &str = "Conventional Mortgage (Level-Pay Amortization with PMI)";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionalInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual rate in percent (6.5 = 6.5%).
    pub interest_rate: Percent,
    /// Term in years.
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
pub struct ConventionalOutput {
    pub loan_amount: Money,
    pub down_payment_percent: Percent,
    pub monthly_rate: Rate,
    pub number_of_payments: u32,
    pub principal_and_interest: Money,
    pub pmi_required: bool,
    pub pmi: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
    /// P&I + PMI + escrow.
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_conventional(
    input: &ConventionalInput,
) -> LendingResult<ComputationOutput<ConventionalOutput>> {
    calculate_conventional_with(input, &ProgramAssumptions::default())
}

pub fn calculate_conventional_with(
    input: &ConventionalInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<ComputationOutput<ConventionalOutput>> {
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
    input: &ConventionalInput,
    assumptions: &ProgramAssumptions,
) -> LendingResult<(ConventionalOutput, Vec<String>)> {
    validate_purchase(
        input.home_price,
        input.down_payment,
        input.interest_rate,
        input.loan_term,
    )?;
    validate_escrow(input.property_tax, input.insurance, input.hoa)?;

    let mut warnings = Vec::new();

    let principal = input.home_price - input.down_payment;
    let down_payment_percent = percent_of(input.down_payment, input.home_price)?;
    let n = number_of_payments(input.loan_term)?;
    let payments = Decimal::from(n);

    let monthly_pi = amortized_payment(principal, input.interest_rate, input.loan_term)?;

    let pmi_required = down_payment_percent < assumptions.pmi_threshold_percent;
    let pmi = if pmi_required {
        principal * assumptions.pmi_rate / Decimal::from(12)
    } else {
        Decimal::ZERO
    };
    if pmi_required {
        warnings.push(format!(
            "Down payment of {}% is below {}%; PMI applies until sufficient equity is reached",
            down_payment_percent.round_dp(2),
            assumptions.pmi_threshold_percent
        ));
    }

    let escrow =
        MonthlyEscrow::from_annual_tax_and_insurance(input.property_tax, input.insurance, input.hoa);
    let monthly_payment = monthly_pi + pmi + escrow.total();

    debug!(
        loan_amount = %principal,
        principal_and_interest = %monthly_pi,
        pmi = %pmi,
        monthly_payment = %monthly_payment,
        "conventional payment computed"
    );

    Ok((
        ConventionalOutput {
            loan_amount: principal,
            down_payment_percent,
            monthly_rate: monthly_rate(input.interest_rate),
            number_of_payments: n,
            principal_and_interest: monthly_pi,
            pmi_required,
            pmi,
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

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_input() -> ConventionalInput {
        ConventionalInput {
            home_price: dec!(300_000),
            down_payment: dec!(60_000),
            interest_rate: dec!(6.5),
            loan_term: 30,
            property_tax: Some(dec!(3600)),
            insurance: Some(dec!(1200)),
            hoa: Some(Decimal::ZERO),
        }
    }

    fn run(input: &ConventionalInput) -> ConventionalOutput {
        calculate_conventional(input).unwrap().result
    }

    #[test]
    fn test_thirty_year_scenario() {
        let out = run(&standard_input());
        assert_eq!(out.loan_amount, dec!(240_000));
        assert_eq!(out.number_of_payments, 360);
        assert_close(out.monthly_rate, dec!(0.0054167), dec!(0.0000001), "monthly rate");
        assert_close(out.principal_and_interest, dec!(1516.96), TOL, "P&I");
        assert_eq!(out.monthly_property_tax, dec!(300));
        assert_eq!(out.monthly_insurance, dec!(100));
        assert_close(out.monthly_payment, dec!(1916.96), TOL, "total monthly");
    }

    #[test]
    fn test_exactly_twenty_percent_has_no_pmi() {
        let out = run(&standard_input());
        assert_eq!(out.down_payment_percent, dec!(20));
        assert!(!out.pmi_required);
        assert_eq!(out.pmi, Decimal::ZERO);
    }

    #[test]
    fn test_pmi_below_twenty_percent() {
        let mut input = standard_input();
        input.down_payment = dec!(30_000);
        let result = calculate_conventional(&input).unwrap();
        let out = &result.result;
        assert!(out.pmi_required);
        // 270k * 0.5% / 12 = 112.50
        assert_eq!(out.pmi, dec!(112.5));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_hoa_is_monthly() {
        let mut input = standard_input();
        input.hoa = Some(dec!(150));
        let out = run(&input);
        assert_eq!(out.monthly_hoa, dec!(150));
        assert_close(out.monthly_payment, dec!(2066.96), TOL, "with HOA");
    }

    #[test]
    fn test_totals() {
        let out = run(&standard_input());
        let n = Decimal::from(out.number_of_payments);
        assert_eq!(
            out.total_interest,
            out.principal_and_interest * n - out.loan_amount
        );
        assert_eq!(out.total_paid, out.monthly_payment * n);
    }

    #[test]
    fn test_zero_rate_linear_payment() {
        let mut input = standard_input();
        input.interest_rate = Decimal::ZERO;
        let out = run(&input);
        assert_eq!(out.principal_and_interest, dec!(240_000) / dec!(360));
        assert_close(out.total_interest, Decimal::ZERO, dec!(0.000001), "interest");
    }

    #[test]
    fn test_full_cash_purchase() {
        let mut input = standard_input();
        input.down_payment = input.home_price;
        let out = run(&input);
        assert_eq!(out.loan_amount, Decimal::ZERO);
        assert_eq!(out.principal_and_interest, Decimal::ZERO);
        assert_eq!(out.monthly_payment, dec!(400));
    }

    #[test]
    fn test_optional_escrow_omitted() {
        let input: ConventionalInput = serde_json::from_str(
            r#"{"home_price": 400000, "down_payment": 100000, "interest_rate": 7, "loan_term": 15}"#,
        )
        .unwrap();
        let out = run(&input);
        assert_eq!(out.monthly_payment, out.principal_and_interest);
    }

    #[test]
    fn test_validation_zero_term() {
        let mut input = standard_input();
        input.loan_term = 0;
        let err = calculate_conventional(&input).unwrap_err();
        assert_eq!(err.field(), Some("loan_term"));
    }

    #[test]
    fn test_validation_negative_tax() {
        let mut input = standard_input();
        input.property_tax = Some(dec!(-1));
        let err = calculate_conventional(&input).unwrap_err();
        assert_eq!(err.field(), Some("property_tax"));
    }

    #[test]
    fn test_custom_pmi_rate() {
        let mut input = standard_input();
        input.down_payment = dec!(15_000);
        let assumptions = ProgramAssumptions {
            pmi_rate: dec!(0.012),
            ..Default::default()
        };
        let out = calculate_conventional_with(&input, &assumptions)
            .unwrap()
            .result;
        // 285k * 1.2% / 12 = 285
        assert_eq!(out.pmi, dec!(285));
    }

    #[test]
    fn test_metadata_populated() {
        let result = calculate_conventional(&standard_input()).unwrap();
        assert!(result.methodology.contains("Conventional"));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }
}
