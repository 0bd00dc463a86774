use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{BillingError, Result};
use crate::types::PeriodUnit;

/// the terms of a loan product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term: u32,
    pub period_unit: PeriodUnit,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term: u32, period_unit: PeriodUnit) -> Self {
        Self {
            principal,
            annual_rate,
            term,
            period_unit,
        }
    }

    /// the standard product: 5,000,000 principal at 10% annual over 50 weeks
    pub fn standard() -> Self {
        Self {
            principal: Money::from_decimal(dec!(5_000_000)),
            annual_rate: Rate::from_percentage(10),
            term: 50,
            period_unit: PeriodUnit::Week,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.term == 0 {
            return Err(BillingError::InvalidLoanTerms {
                message: "term must be at least one period".to_string(),
            });
        }
        if !self.principal.is_positive() {
            return Err(BillingError::InvalidLoanTerms {
                message: format!("principal must be positive, got {}", self.principal),
            });
        }
        if self.annual_rate.is_negative() {
            return Err(BillingError::InvalidLoanTerms {
                message: format!("annual rate must not be negative, got {}", self.annual_rate),
            });
        }
        Ok(())
    }
}
