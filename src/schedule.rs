use chrono::Duration;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::types::{Installment, InstallmentStatus, Loan};

/// generate the full installment schedule for a loan
///
/// every installment carries the same amount, `total_repayment / term`
/// rounded to money scale; any rounding residual from the division is left
/// unassigned, so the schedule sum may drift from the total by less than one
/// rounding unit. due dates fall seven days apart starting one week after
/// creation, whatever the loan's period unit.
pub fn generate_installments(loan: &Loan) -> Vec<Installment> {
    let amount = loan.total_repayment / Decimal::from(loan.term);

    (0..loan.term)
        .map(|i| Installment {
            id: Uuid::new_v4(),
            loan_id: loan.id,
            borrower_id: loan.borrower_id,
            amount,
            due_date: loan.created_at + Duration::days(7 * (i as i64 + 1)),
            status: InstallmentStatus::Unpaid,
            paid_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::types::PeriodUnit;
    use chrono::{DateTime, TimeZone, Utc};

    fn loan(total: Money, term: u32, created_at: DateTime<Utc>) -> Loan {
        Loan {
            id: Uuid::new_v4(),
            borrower_id: Uuid::new_v4(),
            principal: total,
            annual_interest_rate: Rate::from_percentage(10),
            total_repayment: total,
            term,
            period_unit: PeriodUnit::Week,
            created_at,
        }
    }

    #[test]
    fn test_equal_amounts_and_count() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let schedule = generate_installments(&loan(Money::from_major(5_500_000), 50, created));

        assert_eq!(schedule.len(), 50);
        for inst in &schedule {
            assert_eq!(inst.amount, Money::from_major(110_000));
            assert_eq!(inst.status, InstallmentStatus::Unpaid);
            assert!(inst.paid_at.is_none());
        }

        let total: Money = schedule.iter().map(|i| i.amount).sum();
        assert_eq!(total, Money::from_major(5_500_000));
    }

    #[test]
    fn test_weekly_due_dates() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let schedule = generate_installments(&loan(Money::from_major(1_000), 4, created));

        for (i, inst) in schedule.iter().enumerate() {
            assert_eq!(
                inst.due_date,
                created + Duration::days(7 * (i as i64 + 1))
            );
        }
        // strictly increasing
        for pair in schedule.windows(2) {
            assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    #[test]
    fn test_monthly_unit_keeps_weekly_cadence() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut l = loan(Money::from_major(1_200), 12, created);
        l.period_unit = PeriodUnit::Month;

        let schedule = generate_installments(&l);
        assert_eq!(schedule[0].due_date, created + Duration::days(7));
        assert_eq!(schedule[11].due_date, created + Duration::days(84));
    }

    #[test]
    fn test_rounding_residual_stays_within_one_unit() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        // 1,000 / 3 = 333.3333 each; sum 999.9999
        let schedule = generate_installments(&loan(Money::from_major(1_000), 3, created));

        let total: Money = schedule.iter().map(|i| i.amount).sum();
        let residual = (Money::from_major(1_000) - total).abs();
        assert!(residual < Money::ONE);
        assert!(!residual.is_zero());
    }

    #[test]
    fn test_installments_carry_loan_and_borrower_ids() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let l = loan(Money::from_major(500), 5, created);
        let schedule = generate_installments(&l);

        for inst in &schedule {
            assert_eq!(inst.loan_id, l.id);
            assert_eq!(inst.borrower_id, l.borrower_id);
        }
    }
}
