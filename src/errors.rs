use thiserror::Error;

use crate::decimal::Money;
use crate::types::{BorrowerId, LoanId};

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("unknown period unit: {unit}")]
    UnknownPeriodUnit {
        unit: String,
    },

    #[error("invalid loan terms: {message}")]
    InvalidLoanTerms {
        message: String,
    },

    #[error("borrower {borrower_id} has an outstanding loan balance of {outstanding}")]
    OutstandingLoan {
        borrower_id: BorrowerId,
        outstanding: Money,
    },

    #[error("payment below minimum due: you must pay at least {minimum}, got {provided}")]
    PaymentBelowMinimum {
        minimum: Money,
        provided: Money,
    },

    #[error("payment {provided} does not settle a whole number of installments: pay {minimum} or a multiple thereof, up to {maximum}")]
    PaymentNotInPlan {
        provided: Money,
        minimum: Money,
        maximum: Money,
    },

    #[error("loan {loan_id} is fully paid, nothing to settle")]
    LoanFullyPaid {
        loan_id: LoanId,
    },

    #[error("loan not found: {loan_id}")]
    LoanNotFound {
        loan_id: LoanId,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
