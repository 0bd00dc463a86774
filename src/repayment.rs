use rust_decimal::Decimal;

use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::errors::Result;

/// compute the total amount owed over the life of a loan
///
/// simple interest over the term expressed in years:
/// `principal + principal * (rate / 100) * (term / periods_per_year)`,
/// rounded to whole units half-away-from-zero. computed once at loan
/// creation; never recomputed afterward.
pub fn total_repayment(terms: &LoanTerms) -> Result<Money> {
    terms.validate()?;

    // exact rational division, not integer truncation
    let years = Decimal::from(terms.term) / terms.period_unit.periods_per_year();
    let interest = terms.principal * terms.annual_rate.as_decimal() * years;

    Ok((terms.principal + interest).round_whole())
}
