//! Year-by-year amortization schedule for a level-pay loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    amortized_payment, monthly_rate, number_of_payments, MAX_INPUT_AMOUNT,
};
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LendingResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationScheduleInput {
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub loan_term: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub years: Vec<ScheduleYear>,
}

pub fn amortization_schedule(
    input: &AmortizationScheduleInput,
) -> LendingResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();

    if input.loan_amount <= Decimal::ZERO {
        return Err(LendingError::invalid(
            "loan_amount",
            "Loan amount must be greater than zero",
        ));
    }
    if input.loan_amount > MAX_INPUT_AMOUNT {
        return Err(LendingError::invalid(
            "loan_amount",
            "Exceeds the supported maximum of 1,000,000,000,000,000",
        ));
    }

    let payment = amortized_payment(input.loan_amount, input.interest_rate, input.loan_term)?;
    let n = number_of_payments(input.loan_term)?;
    let r = monthly_rate(input.interest_rate);

    let mut balance = input.loan_amount;
    let mut total_interest = Decimal::ZERO;
    let mut years = Vec::with_capacity(input.loan_term as usize);
    let mut year_principal = Decimal::ZERO;
    let mut year_interest = Decimal::ZERO;

    for month in 1..=n {
        let interest = balance * r;
        let mut principal = payment - interest;
        // Final month absorbs rounding so the loan closes at exactly zero.
        if month == n || principal > balance {
            principal = balance;
        }
        balance -= principal;

        year_principal += principal;
        year_interest += interest;
        total_interest += interest;

        if month % 12 == 0 {
            years.push(ScheduleYear {
                year: month / 12,
                principal_paid: year_principal,
                interest_paid: year_interest,
                ending_balance: balance,
            });
            year_principal = Decimal::ZERO;
            year_interest = Decimal::ZERO;
        }
    }

    let output = AmortizationSchedule {
        monthly_payment: payment,
        total_interest,
        total_paid: input.loan_amount + total_interest,
        years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Pay Amortization Schedule (Annual Summary)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    fn run(loan_amount: Decimal, rate: Decimal, term: u32) -> AmortizationSchedule {
        amortization_schedule(&AmortizationScheduleInput {
            loan_amount,
            interest_rate: rate,
            loan_term: term,
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_one_row_per_year() {
        let s = run(dec!(240_000), dec!(6.5), 30);
        assert_eq!(s.years.len(), 30);
        assert_eq!(s.years[0].year, 1);
        assert_eq!(s.years[29].year, 30);
    }

    #[test]
    fn test_closes_at_zero() {
        let s = run(dec!(240_000), dec!(6.5), 30);
        assert_eq!(s.years.last().unwrap().ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_principal_sums_to_loan() {
        let s = run(dec!(240_000), dec!(6.5), 30);
        let principal: Decimal = s.years.iter().map(|y| y.principal_paid).sum();
        assert!((principal - dec!(240_000)).abs() < TOL);
    }

    #[test]
    fn test_interest_front_loaded() {
        let s = run(dec!(240_000), dec!(6.5), 30);
        assert!(s.years[0].interest_paid > s.years[0].principal_paid);
        assert!(s.years[29].interest_paid < s.years[29].principal_paid);
        assert!(s.years[0].interest_paid > s.years[1].interest_paid);
    }

    #[test]
    fn test_total_interest_matches_closed_form() {
        let s = run(dec!(240_000), dec!(6.5), 30);
        let closed_form = s.monthly_payment * dec!(360) - dec!(240_000);
        assert!((s.total_interest - closed_form).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let s = run(dec!(120_000), Decimal::ZERO, 10);
        assert_eq!(s.total_interest, Decimal::ZERO);
        for y in &s.years {
            assert!((y.principal_paid - dec!(12_000)).abs() < TOL);
        }
    }

    #[test]
    fn test_rejects_empty_loan() {
        let err = amortization_schedule(&AmortizationScheduleInput {
            loan_amount: Decimal::ZERO,
            interest_rate: dec!(5),
            loan_term: 30,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("loan_amount"));
    }

    #[test]
    fn test_rejects_term_past_cap() {
        let err = amortization_schedule(&AmortizationScheduleInput {
            loan_amount: dec!(120_000),
            interest_rate: Decimal::ZERO,
            loan_term: 1_000_000,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("loan_term"));
    }

    #[test]
    fn test_runaway_rate_is_overflow() {
        let err = amortization_schedule(&AmortizationScheduleInput {
            loan_amount: dec!(240_000),
            interest_rate: dec!(1000),
            loan_term: 30,
        })
        .unwrap_err();
        assert!(matches!(err, LendingError::Overflow { .. }));
    }
}
