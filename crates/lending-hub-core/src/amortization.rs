use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LendingError;
use crate::types::{Money, Percent, Rate};
use crate::LendingResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 50;

/// Largest amount (or rate) accepted on any calculator input.
pub const MAX_INPUT_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Periodic (monthly) rate from an annual percentage rate: 6.5 -> 0.0054166...
pub fn monthly_rate(annual_rate: Percent) -> Rate {
    annual_rate / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Number of monthly payments for a term in whole years.
pub fn number_of_payments(term_years: u32) -> LendingResult<u32> {
    check_term("loan_term", term_years)?;
    Ok(term_years * MONTHS_PER_YEAR)
}

/// Rejects a term of zero or longer than [`MAX_TERM_YEARS`], naming `field`.
pub fn check_term(field: &str, term_years: u32) -> LendingResult<()> {
    if term_years == 0 {
        return Err(LendingError::invalid(
            field,
            "Loan term must be at least one year",
        ));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(LendingError::invalid(
            field,
            "Loan term cannot exceed 50 years",
        ));
    }
    Ok(())
}

/// Level monthly payment that amortizes `principal` over `term_years`.
///
/// A zero rate uses the straight-line branch `principal / n`; otherwise the
/// annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)`, evaluated as
/// `P·r / (1 − (1+r)^−n)` so large growth factors stay in range.
pub fn amortized_payment(
    principal: Money,
    annual_rate: Percent,
    term_years: u32,
) -> LendingResult<Money> {
    validate_rate(annual_rate)?;
    let n = number_of_payments(term_years)?;
    let r = monthly_rate(annual_rate);

    if r.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let denom = annuity_discount(r, n)?;
    if denom.is_zero() {
        return Err(LendingError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    principal
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(denom))
        .ok_or_else(|| overflow("annuity payment"))
}

/// Inverse of [`amortized_payment`]: the largest principal a fixed monthly
/// payment retires over `term_years`.
pub fn principal_from_payment(
    payment: Money,
    annual_rate: Percent,
    term_years: u32,
) -> LendingResult<Money> {
    validate_rate(annual_rate)?;
    let n = number_of_payments(term_years)?;
    let r = monthly_rate(annual_rate);

    if r.is_zero() {
        return Ok(payment * Decimal::from(n));
    }

    let discount = annuity_discount(r, n)?;
    payment
        .checked_mul(discount)
        .and_then(|scaled| scaled.checked_div(r))
        .ok_or_else(|| overflow("annuity present value"))
}

/// 1 − (1 + r)^−n
fn annuity_discount(r: Rate, n: u32) -> LendingResult<Decimal> {
    let factor = growth_factor(r, n)?;
    let inverse = Decimal::ONE
        .checked_div(factor)
        .ok_or_else(|| overflow("annuity discount factor"))?;
    Ok(Decimal::ONE - inverse)
}

/// (1 + r)^n
fn growth_factor(r: Rate, n: u32) -> LendingResult<Decimal> {
    Decimal::ONE
        .checked_add(r)
        .and_then(|base| base.checked_powu(u64::from(n)))
        .ok_or_else(|| LendingError::Overflow {
            context: format!("compounding {n} periods at {r}"),
        })
}

fn overflow(context: &str) -> LendingError {
    LendingError::Overflow {
        context: context.into(),
    }
}

fn validate_rate(annual_rate: Percent) -> LendingResult<()> {
    if annual_rate < Decimal::ZERO {
        return Err(LendingError::invalid(
            "interest_rate",
            "Interest rate cannot be negative",
        ));
    }
    Ok(())
}
