use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{Borrower, BorrowerId, Installment, InstallmentId, InstallmentStatus, Loan, LoanId};

/// persistence contract consumed by the billing engine
///
/// the engine computes the correct mutation; consistency of the stored data
/// is the implementation's responsibility. `create_loan_and_installments`
/// and `mark_installments_paid` are expected to be atomic.
pub trait LoanStore: Send + Sync {
    /// persist a loan together with its full installment schedule, or neither
    fn create_loan_and_installments(&self, loan: &Loan, installments: &[Installment]) -> Result<()>;

    /// unpaid installments for a loan, ordered by due date ascending
    fn find_unpaid_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>>;

    /// flip the listed installments from unpaid to paid, atomically
    fn mark_installments_paid(&self, ids: &[InstallmentId], paid_at: DateTime<Utc>) -> Result<()>;

    /// sum of unpaid installment amounts for a loan
    fn total_outstanding_by_loan(&self, loan_id: LoanId) -> Result<Money>;

    /// sum of unpaid installment amounts across all of a borrower's loans
    fn total_outstanding_by_borrower(&self, borrower_id: BorrowerId) -> Result<Money>;

    fn create_borrower(&self, borrower: &Borrower) -> Result<()>;

    fn list_borrowers(&self) -> Result<Vec<Borrower>>;

    fn find_loan(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    fn find_loans_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Loan>>;

    /// all installments for a loan regardless of status, due date ascending
    fn find_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>>;

    /// unpaid installments across all of a borrower's loans
    fn find_unpaid_installments_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Installment>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    borrowers: HashMap<BorrowerId, Borrower>,
    loans: HashMap<LoanId, Loan>,
    installments: HashMap<InstallmentId, Installment>,
}

/// thread-safe in-memory store, used by the tests and demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_by_due_date(mut installments: Vec<Installment>) -> Vec<Installment> {
        installments.sort_by_key(|i| i.due_date);
        installments
    }
}

impl LoanStore for MemoryStore {
    fn create_loan_and_installments(&self, loan: &Loan, installments: &[Installment]) -> Result<()> {
        // single write lock makes the pair atomic
        let mut state = self.state.write();
        state.loans.insert(loan.id, loan.clone());
        for inst in installments {
            state.installments.insert(inst.id, inst.clone());
        }
        Ok(())
    }

    fn find_unpaid_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        let state = self.state.read();
        let unpaid = state
            .installments
            .values()
            .filter(|i| i.loan_id == loan_id && i.is_unpaid())
            .cloned()
            .collect();
        Ok(Self::sorted_by_due_date(unpaid))
    }

    fn mark_installments_paid(&self, ids: &[InstallmentId], paid_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.write();
        for id in ids {
            if let Some(inst) = state.installments.get_mut(id) {
                if inst.is_unpaid() {
                    inst.status = InstallmentStatus::Paid;
                    inst.paid_at = Some(paid_at);
                }
            }
        }
        Ok(())
    }

    fn total_outstanding_by_loan(&self, loan_id: LoanId) -> Result<Money> {
        let state = self.state.read();
        Ok(state
            .installments
            .values()
            .filter(|i| i.loan_id == loan_id && i.is_unpaid())
            .map(|i| i.amount)
            .sum())
    }

    fn total_outstanding_by_borrower(&self, borrower_id: BorrowerId) -> Result<Money> {
        let state = self.state.read();
        Ok(state
            .installments
            .values()
            .filter(|i| i.borrower_id == borrower_id && i.is_unpaid())
            .map(|i| i.amount)
            .sum())
    }

    fn create_borrower(&self, borrower: &Borrower) -> Result<()> {
        let mut state = self.state.write();
        state.borrowers.insert(borrower.id, borrower.clone());
        Ok(())
    }

    fn list_borrowers(&self) -> Result<Vec<Borrower>> {
        let state = self.state.read();
        let mut borrowers: Vec<_> = state.borrowers.values().cloned().collect();
        borrowers.sort_by_key(|b| b.created_at);
        Ok(borrowers)
    }

    fn find_loan(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let state = self.state.read();
        Ok(state.loans.get(&loan_id).cloned())
    }

    fn find_loans_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Loan>> {
        let state = self.state.read();
        let mut loans: Vec<_> = state
            .loans
            .values()
            .filter(|l| l.borrower_id == borrower_id)
            .cloned()
            .collect();
        loans.sort_by_key(|l| l.created_at);
        Ok(loans)
    }

    fn find_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        let state = self.state.read();
        let all = state
            .installments
            .values()
            .filter(|i| i.loan_id == loan_id)
            .cloned()
            .collect();
        Ok(Self::sorted_by_due_date(all))
    }

    fn find_unpaid_installments_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Installment>> {
        let state = self.state.read();
        let unpaid = state
            .installments
            .values()
            .filter(|i| i.borrower_id == borrower_id && i.is_unpaid())
            .cloned()
            .collect();
        Ok(Self::sorted_by_due_date(unpaid))
    }
}
