pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod lock;
pub mod plan;
pub mod repayment;
pub mod schedule;
pub mod store;
pub mod types;

// re-export key types
pub use config::LoanTerms;
pub use decimal::{Money, Rate};
pub use engine::{BillingEngine, PaymentReceipt};
pub use errors::{BillingError, Result};
pub use lock::LockManager;
pub use plan::PaymentPlan;
pub use repayment::total_repayment;
pub use schedule::generate_installments;
pub use store::{LoanStore, MemoryStore};
pub use types::{
    Borrower, BorrowerId, BorrowerStanding, Installment, InstallmentId, InstallmentStatus, Loan,
    LoanId, LoanStatus, LoanSummary, PeriodUnit,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
