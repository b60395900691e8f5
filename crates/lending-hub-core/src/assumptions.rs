//! Loan-program constants shared by the calculators.
//!
//! `ProgramAssumptions::default()` carries the standard figures; a lender can
//! override any of them (the CLI loads overrides from JSON or YAML). Missing
//! fields fall back to the defaults.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::types::{Money, Percent, Rate};
use crate::LendingResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramAssumptions {
    /// Annual PMI rate charged on the loan amount (0.005 = 0.5%/yr).
    pub pmi_rate: Rate,
    /// Down-payment percentage at or above which PMI is waived.
    pub pmi_threshold_percent: Percent,
    /// VA funding fee when the request does not specify one.
    pub va_funding_fee_percent: Percent,
    /// FHA upfront MIP, financed into the loan.
    pub fha_upfront_mip_rate: Rate,
    /// FHA annual MIP, charged monthly on the base loan.
    pub fha_annual_mip_rate: Rate,
    /// FHA minimum down payment; below this a warning is attached.
    pub fha_min_down_payment_percent: Percent,
    /// Front-end debt-to-income cap (housing only).
    pub front_end_dti: Rate,
    /// Back-end debt-to-income cap (housing plus other debts).
    pub back_end_dti: Rate,
    /// Annual property tax assumed by the affordability estimate.
    pub default_property_tax: Money,
    /// Annual homeowner's insurance assumed by the affordability estimate.
    pub default_insurance: Money,
}

impl Default for ProgramAssumptions {
    fn default() -> Self {
        Self {
            pmi_rate: dec!(0.005),
            pmi_threshold_percent: dec!(20),
            va_funding_fee_percent: dec!(2.3),
            fha_upfront_mip_rate: dec!(0.0175),
            fha_annual_mip_rate: dec!(0.0085),
            fha_min_down_payment_percent: dec!(3.5),
            front_end_dti: dec!(0.28),
            back_end_dti: dec!(0.36),
            default_property_tax: dec!(2400),
            default_insurance: dec!(1200),
        }
    }
}

impl ProgramAssumptions {
    pub fn validate(&self) -> LendingResult<()> {
        let unit_rates = [
            ("pmi_rate", self.pmi_rate),
            ("fha_upfront_mip_rate", self.fha_upfront_mip_rate),
            ("fha_annual_mip_rate", self.fha_annual_mip_rate),
            ("front_end_dti", self.front_end_dti),
            ("back_end_dti", self.back_end_dti),
        ];
        for (field, value) in unit_rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(LendingError::invalid(field, "Rate must be between 0 and 1"));
            }
        }

        let percents = [
            ("pmi_threshold_percent", self.pmi_threshold_percent),
            ("va_funding_fee_percent", self.va_funding_fee_percent),
            (
                "fha_min_down_payment_percent",
                self.fha_min_down_payment_percent,
            ),
        ];
        for (field, value) in percents {
            if value < Decimal::ZERO || value > dec!(100) {
                return Err(LendingError::invalid(
                    field,
                    "Percentage must be between 0 and 100",
                ));
            }
        }

        if self.front_end_dti > self.back_end_dti {
            return Err(LendingError::invalid(
                "front_end_dti",
                "Front-end DTI cannot exceed back-end DTI",
            ));
        }
        if self.default_property_tax < Decimal::ZERO {
            return Err(LendingError::invalid(
                "default_property_tax",
                "Cannot be negative",
            ));
        }
        if self.default_insurance < Decimal::ZERO {
            return Err(LendingError::invalid("default_insurance", "Cannot be negative"));
        }
        Ok(())
    }
}
