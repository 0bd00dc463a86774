use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::lock::LockManager;
use crate::plan::PaymentPlan;
use crate::repayment::total_repayment;
use crate::schedule::generate_installments;
use crate::store::LoanStore;
use crate::types::{
    is_delinquent, loan_status, Borrower, BorrowerId, BorrowerStanding, Installment, InstallmentId,
    Loan, LoanId, LoanStatus, LoanSummary,
};

/// outcome of a successful payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub loan_id: LoanId,
    pub amount: Money,
    pub paid_at: DateTime<Utc>,
    /// installments settled by this payment, oldest first
    pub settled: Vec<InstallmentId>,
}

/// the billing engine: loan origination and race-free payment application
///
/// payments against the same loan are fully serialized through the per-loan
/// lock registry; payments against different loans proceed in parallel.
pub struct BillingEngine<S: LoanStore> {
    store: S,
    locks: LockManager,
}

impl<S: LoanStore> BillingEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: LockManager::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_borrower(&self, name: &str, time: &SafeTimeProvider) -> Result<Borrower> {
        let borrower = Borrower {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: time.now(),
        };
        self.store.create_borrower(&borrower)?;
        debug!(borrower_id = %borrower.id, "borrower created");
        Ok(borrower)
    }

    /// all borrowers with their derived delinquency status: more than one
    /// unpaid installment past due
    pub fn list_borrowers(&self, time: &SafeTimeProvider) -> Result<Vec<BorrowerStanding>> {
        let now = time.now();
        self.store
            .list_borrowers()?
            .into_iter()
            .map(|borrower| {
                let unpaid = self.store.find_unpaid_installments_by_borrower(borrower.id)?;
                Ok(BorrowerStanding {
                    is_delinquent: is_delinquent(&unpaid, now),
                    borrower,
                })
            })
            .collect()
    }

    /// originate a loan and its full installment schedule in one atomic write
    ///
    /// rejected while the borrower still owes anything on any existing loan;
    /// one active loan per borrower at a time
    pub fn request_loan(
        &self,
        borrower_id: BorrowerId,
        terms: LoanTerms,
        time: &SafeTimeProvider,
    ) -> Result<Loan> {
        let outstanding = self.store.total_outstanding_by_borrower(borrower_id)?;
        if !outstanding.is_zero() {
            return Err(BillingError::OutstandingLoan {
                borrower_id,
                outstanding,
            });
        }

        let total = total_repayment(&terms)?;
        let loan = Loan {
            id: Uuid::new_v4(),
            borrower_id,
            principal: terms.principal,
            annual_interest_rate: terms.annual_rate,
            total_repayment: total,
            term: terms.term,
            period_unit: terms.period_unit,
            created_at: time.now(),
        };
        let installments = generate_installments(&loan);

        self.store.create_loan_and_installments(&loan, &installments)?;
        info!(
            loan_id = %loan.id,
            %borrower_id,
            total = %total,
            term = terms.term,
            "loan originated"
        );
        Ok(loan)
    }

    /// originate a loan on the standard product terms
    pub fn request_standard_loan(
        &self,
        borrower_id: BorrowerId,
        time: &SafeTimeProvider,
    ) -> Result<Loan> {
        self.request_loan(borrower_id, LoanTerms::standard(), time)
    }

    /// a borrower's loans with their derived completion status
    pub fn loans_for_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<LoanSummary>> {
        self.store
            .find_loans_by_borrower(borrower_id)?
            .into_iter()
            .map(|loan| {
                let outstanding = self.store.total_outstanding_by_loan(loan.id)?;
                Ok(LoanSummary {
                    is_completed: outstanding.is_zero(),
                    loan,
                })
            })
            .collect()
    }

    /// a loan together with what remains on it
    pub fn loan_detail(&self, loan_id: LoanId) -> Result<(Loan, Money)> {
        let loan = self
            .store
            .find_loan(loan_id)?
            .ok_or(BillingError::LoanNotFound { loan_id })?;
        let outstanding = self.store.total_outstanding_by_loan(loan_id)?;
        Ok((loan, outstanding))
    }

    /// full schedule for a loan, due date ascending
    pub fn installments(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        self.store.find_installments(loan_id)
    }

    /// derived lifecycle state of a loan
    pub fn loan_status(&self, loan_id: LoanId) -> Result<LoanStatus> {
        let installments = self.store.find_installments(loan_id)?;
        if installments.is_empty() {
            return Err(BillingError::LoanNotFound { loan_id });
        }
        Ok(loan_status(&installments))
    }

    /// apply a payment against a loan's unpaid installments
    ///
    /// the amount must equal a cumulative prefix of the unpaid schedule
    /// exactly, and must cover at least everything already overdue. settles
    /// the matched prefix in one atomic update.
    pub fn make_payment(
        &self,
        loan_id: LoanId,
        amount: Money,
        time: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        let lock = self.locks.lock_for(loan_id);
        // guard held for the whole application; drops on every path
        let _guard = lock.lock();

        let unpaid = self.store.find_unpaid_installments(loan_id)?;
        if unpaid.is_empty() {
            return match self.store.find_loan(loan_id)? {
                Some(_) => Err(BillingError::LoanFullyPaid { loan_id }),
                None => Err(BillingError::LoanNotFound { loan_id }),
            };
        }

        let now = time.now();
        let plan = PaymentPlan::build(&unpaid, now);
        let index = plan.match_amount(amount)?;

        let settled: Vec<InstallmentId> = unpaid[..=index].iter().map(|i| i.id).collect();
        self.store.mark_installments_paid(&settled, now)?;

        info!(
            %loan_id,
            %amount,
            settled = settled.len(),
            remaining = unpaid.len() - settled.len(),
            "payment applied"
        );
        Ok(PaymentReceipt {
            loan_id,
            amount,
            paid_at: now,
            settled,
        })
    }
}
