/// payment ladder - how overdue installments set the payment floor
use loan_billing_rs::plan::PaymentPlan;
use loan_billing_rs::{BillingEngine, LoanStore, MemoryStore, SafeTimeProvider, TimeSource};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== payment ladder ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let engine = BillingEngine::new(MemoryStore::new());
    let borrower = engine.create_borrower("bob", &time)?;
    let loan = engine.request_standard_loan(borrower.id, &time)?;

    // skip three weeks of payments
    controller.advance(Duration::days(22));

    let unpaid = engine.store().find_unpaid_installments(loan.id)?;
    let plan = PaymentPlan::build(&unpaid, time.now());
    println!("ladder bottom: {}", plan.entries()[0]);
    println!("ladder top:    {}", plan.entries().last().unwrap());
    println!("minimum due:   {} (three installments overdue)\n", plan.minimum_due());

    // paying for one week is below the floor now
    let one_week = unpaid[0].amount;
    match engine.make_payment(loan.id, one_week, &time) {
        Err(e) => println!("one week rejected: {e}"),
        Ok(_) => unreachable!(),
    }

    // catching up on all three clears the arrears
    let catch_up = plan.minimum_due();
    let receipt = engine.make_payment(loan.id, catch_up, &time)?;
    println!("\ncaught up with {}: {} installments settled", catch_up, receipt.settled.len());

    let (_, outstanding) = engine.loan_detail(loan.id)?;
    println!("outstanding after catch-up: {}", outstanding);

    Ok(())
}
