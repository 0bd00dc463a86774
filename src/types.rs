use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::BillingError;

/// unique identifier for a loan
pub type LoanId = Uuid;
/// unique identifier for a borrower
pub type BorrowerId = Uuid;
/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// unit of the loan repayment period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodUnit {
    Week,
    Month,
}

impl PeriodUnit {
    /// how many periods of this unit make up a year
    pub fn periods_per_year(&self) -> Decimal {
        match self {
            PeriodUnit::Week => Decimal::from(52),
            PeriodUnit::Month => Decimal::from(12),
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEEK" => Ok(PeriodUnit::Week),
            "MONTH" => Ok(PeriodUnit::Month),
            other => Err(BillingError::UnknownPeriodUnit {
                unit: other.to_string(),
            }),
        }
    }
}

/// installment status; Paid is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Unpaid,
    Paid,
}

/// a fixed-installment loan
///
/// total_repayment is computed exactly once at creation and never recomputed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower_id: BorrowerId,
    pub principal: Money,
    pub annual_interest_rate: Rate,
    pub total_repayment: Money,
    pub term: u32,
    pub period_unit: PeriodUnit,
    pub created_at: DateTime<Utc>,
}

/// one scheduled fixed-amount portion of a loan's total repayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    pub borrower_id: BorrowerId,
    pub amount: Money,
    pub due_date: DateTime<Utc>,
    pub status: InstallmentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Installment {
    pub fn is_unpaid(&self) -> bool {
        self.status == InstallmentStatus::Unpaid
    }

    /// unpaid and strictly past its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_unpaid() && self.due_date < now
    }
}

/// a borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: BorrowerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// derived loan lifecycle state; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// loan and schedule persisted, nothing paid yet
    Requested,
    /// some but not all installments paid
    PartiallyPaid,
    /// all installments paid
    Complete,
}

/// derive the lifecycle state of a loan from its installments
pub fn loan_status(installments: &[Installment]) -> LoanStatus {
    let paid = installments.iter().filter(|i| !i.is_unpaid()).count();
    if paid == 0 {
        LoanStatus::Requested
    } else if paid == installments.len() {
        LoanStatus::Complete
    } else {
        LoanStatus::PartiallyPaid
    }
}

/// a borrower is delinquent when more than one of their installments is
/// unpaid and past due
pub fn is_delinquent(installments: &[Installment], now: DateTime<Utc>) -> bool {
    installments.iter().filter(|i| i.is_overdue(now)).count() > 1
}

/// loan with its derived completion status, for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    #[serde(flatten)]
    pub loan: Loan,
    pub is_completed: bool,
}

/// borrower with their derived delinquency status, for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerStanding {
    #[serde(flatten)]
    pub borrower: Borrower,
    pub is_delinquent: bool,
}
