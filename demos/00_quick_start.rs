/// quick start - originate a loan and pay it down
use loan_billing_rs::{BillingEngine, MemoryStore, Money, SafeTimeProvider, TimeSource};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== quick start ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let engine = BillingEngine::new(MemoryStore::new());

    // borrower and a loan on the standard product
    let borrower = engine.create_borrower("alice", &time)?;
    let loan = engine.request_standard_loan(borrower.id, &time)?;
    println!("loan originated: {}", loan.id);
    println!("  principal:       {}", loan.principal);
    println!("  total repayment: {}", loan.total_repayment);
    println!("  term:            {} weeks", loan.term);

    let installments = engine.installments(loan.id)?;
    println!("  weekly amount:   {}\n", installments[0].amount);

    // one week in, pay the first installment
    controller.advance(Duration::days(7));
    let receipt = engine.make_payment(loan.id, installments[0].amount, &time)?;
    println!("paid {} on {}", receipt.amount, receipt.paid_at.format("%Y-%m-%d"));
    println!("  installments settled: {}", receipt.settled.len());

    let (_, outstanding) = engine.loan_detail(loan.id)?;
    println!("  outstanding: {}\n", outstanding);

    // an off-plan amount is rejected with the valid range
    match engine.make_payment(loan.id, Money::from_major(150_000), &time) {
        Err(e) => println!("rejected: {e}"),
        Ok(_) => unreachable!(),
    }

    Ok(())
}
