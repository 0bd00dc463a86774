use chrono::{DateTime, Utc};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::Installment;

/// the acceptable payoff ladder for a loan's unpaid installments
///
/// entry `i` is the cumulative amount that settles installments `0..=i` in
/// due-date order. a payment is accepted only when it equals one of the
/// entries exactly: no partial installments, no skipping, nothing between
/// rungs, and nothing beyond the final entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPlan {
    entries: Vec<Money>,
    minimum_due: Money,
}

impl PaymentPlan {
    /// build the ladder from unpaid installments ordered by due date
    ///
    /// `minimum_due` is the sum of every installment already past due at
    /// `now`; a payment below it is rejected outright
    pub fn build(installments: &[Installment], now: DateTime<Utc>) -> Self {
        let mut entries = Vec::with_capacity(installments.len());
        let mut running = Money::ZERO;
        let mut minimum_due = Money::ZERO;

        for inst in installments {
            running += inst.amount;
            entries.push(running);
            if inst.due_date < now {
                minimum_due += inst.amount;
            }
        }

        Self {
            entries,
            minimum_due,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Money] {
        &self.entries
    }

    pub fn minimum_due(&self) -> Money {
        self.minimum_due
    }

    /// decide whether `amount` is acceptable, returning the index of the
    /// last installment it settles
    pub fn match_amount(&self, amount: Money) -> Result<usize> {
        if amount < self.minimum_due {
            return Err(BillingError::PaymentBelowMinimum {
                minimum: self.minimum_due,
                provided: amount,
            });
        }

        match self.entries.iter().position(|entry| *entry == amount) {
            Some(index) => Ok(index),
            None => Err(BillingError::PaymentNotInPlan {
                provided: amount,
                minimum: self.entries.first().copied().unwrap_or(Money::ZERO),
                maximum: self.entries.last().copied().unwrap_or(Money::ZERO),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstallmentStatus;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn schedule(amounts: &[i64], start: DateTime<Utc>) -> Vec<Installment> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| Installment {
                id: Uuid::new_v4(),
                loan_id: Uuid::new_v4(),
                borrower_id: Uuid::new_v4(),
                amount: Money::from_major(*amount),
                due_date: start + Duration::days(7 * (i as i64 + 1)),
                status: InstallmentStatus::Unpaid,
                paid_at: None,
            })
            .collect()
    }

    #[test]
    fn test_ladder_is_running_sum() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let plan = PaymentPlan::build(&schedule(&[110_000; 50], start), start);

        assert_eq!(plan.entries().len(), 50);
        assert_eq!(plan.entries()[0], Money::from_major(110_000));
        assert_eq!(plan.entries()[1], Money::from_major(220_000));
        assert_eq!(plan.entries()[49], Money::from_major(5_500_000));
    }

    #[test]
    fn test_minimum_due_counts_overdue_only() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let installments = schedule(&[110_000; 5], start);

        // nothing due before the first installment's date
        let plan = PaymentPlan::build(&installments, start + Duration::days(7));
        assert_eq!(plan.minimum_due(), Money::ZERO);

        // two weeks and a day in, the first two are overdue
        let plan = PaymentPlan::build(&installments, start + Duration::days(15));
        assert_eq!(plan.minimum_due(), Money::from_major(220_000));
    }

    #[test]
    fn test_exact_entry_matches() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let plan = PaymentPlan::build(&schedule(&[110_000; 50], start), start);

        assert_eq!(plan.match_amount(Money::from_major(110_000)).unwrap(), 0);
        assert_eq!(plan.match_amount(Money::from_major(220_000)).unwrap(), 1);
        assert_eq!(plan.match_amount(Money::from_major(5_500_000)).unwrap(), 49);
    }

    #[test]
    fn test_off_ladder_amount_reports_range() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let plan = PaymentPlan::build(&schedule(&[110_000; 50], start), start);

        let err = plan.match_amount(Money::from_major(150_000)).unwrap_err();
        match err {
            BillingError::PaymentNotInPlan {
                provided,
                minimum,
                maximum,
            } => {
                assert_eq!(provided, Money::from_major(150_000));
                assert_eq!(minimum, Money::from_major(110_000));
                assert_eq!(maximum, Money::from_major(5_500_000));
            }
            other => panic!("expected PaymentNotInPlan, got {other:?}"),
        }

        // overpayment beyond the final rung is off-ladder too
        assert!(plan.match_amount(Money::from_major(5_610_000)).is_err());
    }

    #[test]
    fn test_underpayment_reports_minimum() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let installments = schedule(&[110_000; 5], start);
        let plan = PaymentPlan::build(&installments, start + Duration::days(15));

        // 110,000 is on the ladder but below the 220,000 now due
        let err = plan.match_amount(Money::from_major(110_000)).unwrap_err();
        match err {
            BillingError::PaymentBelowMinimum { minimum, provided } => {
                assert_eq!(minimum, Money::from_major(220_000));
                assert_eq!(provided, Money::from_major(110_000));
            }
            other => panic!("expected PaymentBelowMinimum, got {other:?}"),
        }
    }

    #[test]
    fn test_catching_up_past_minimum_is_allowed() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let installments = schedule(&[110_000; 5], start);
        let plan = PaymentPlan::build(&installments, start + Duration::days(15));

        // paying ahead of the overdue pair is fine as long as it stays on
        // the ladder
        assert_eq!(plan.match_amount(Money::from_major(330_000)).unwrap(), 2);
    }
}
