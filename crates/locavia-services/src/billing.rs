//! Billing math
//!
//! Day counting, overdue fines and settlement totals for rental contracts.
//! Everything here is pure so the billing policy is testable without a
//! database; the rental manager feeds these results into its transactions.
//!
//! Day-count policy: any started day bills in full, and a rental never
//! bills less than one day. A tool taken and returned within the same
//! afternoon is a one-day rental.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::constants::{MIN_RENTAL_DAYS, SECONDS_PER_DAY};

/// Expected billing of a rental at checkout time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Billed days between start and agreed return
    pub total_days: i64,

    /// Days times the agreed daily rate
    pub total_amount: Decimal,
}

/// Final billing of a rental at check-in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Billed days between start and actual return
    pub total_days: i64,

    /// Days times the agreed daily rate, before fines
    pub base_amount: Decimal,

    /// Started days past the agreed return date
    pub overdue_days: i64,

    /// Fine charged for the overdue days
    pub fine_amount: Decimal,

    /// Base amount plus fine
    pub total_amount: Decimal,
}

/// Billed days between two instants
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds().max(0);
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    days.max(MIN_RENTAL_DAYS)
}

/// Started days the actual return lies past the agreed return
pub fn overdue_days(end_date_expected: DateTime<Utc>, end_date_actual: DateTime<Utc>) -> i64 {
    let seconds = (end_date_actual - end_date_expected).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// Fine for a number of overdue days
///
/// Each overdue day is fined `fine_percent` of the daily rate; the fine is
/// rounded to cents.
pub fn overdue_fine(daily_rate: Decimal, overdue_days: i64, fine_percent: Decimal) -> Decimal {
    if overdue_days <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(overdue_days) * daily_rate * fine_percent / Decimal::ONE_HUNDRED).round_dp(2)
}

/// Quote a rental before it starts
pub fn quote(start: DateTime<Utc>, end_date_expected: DateTime<Utc>, daily_rate: Decimal) -> Quote {
    let total_days = days_between(start, end_date_expected);
    let total_amount = (Decimal::from(total_days) * daily_rate).round_dp(2);

    Quote {
        total_days,
        total_amount,
    }
}

/// Settle a rental at its actual return
pub fn settle(
    start: DateTime<Utc>,
    end_date_expected: DateTime<Utc>,
    end_date_actual: DateTime<Utc>,
    daily_rate: Decimal,
    fine_percent: Decimal,
) -> Settlement {
    let total_days = days_between(start, end_date_actual);
    let base_amount = (Decimal::from(total_days) * daily_rate).round_dp(2);
    let overdue = overdue_days(end_date_expected, end_date_actual);
    let fine_amount = overdue_fine(daily_rate, overdue, fine_percent);
    let total_amount = base_amount + fine_amount;

    Settlement {
        total_days,
        base_amount,
        overdue_days: overdue,
        fine_amount,
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_four_day_rental() {
        // Jan 1 to Jan 5 at 50.00/day
        let q = quote(date(2024, 1, 1), date(2024, 1, 5), dec!(50.00));
        assert_eq!(q.total_days, 4);
        assert_eq!(q.total_amount, dec!(200.00));
    }

    #[test]
    fn test_same_day_rental_bills_one_day() {
        let q = quote(
            datetime(2024, 1, 1, 10),
            datetime(2024, 1, 1, 15),
            dec!(50.00),
        );
        assert_eq!(q.total_days, 1);
        assert_eq!(q.total_amount, dec!(50.00));

        // zero-length interval too
        let q = quote(date(2024, 1, 1), date(2024, 1, 1), dec!(50.00));
        assert_eq!(q.total_days, 1);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        // 4 days and 6 hours bills as 5 days
        let days = days_between(date(2024, 1, 1), datetime(2024, 1, 5, 6));
        assert_eq!(days, 5);
    }

    #[test]
    fn test_on_time_return_has_no_fine() {
        let s = settle(
            date(2024, 1, 1),
            date(2024, 1, 5),
            date(2024, 1, 5),
            dec!(50.00),
            dec!(10),
        );
        assert_eq!(s.total_days, 4);
        assert_eq!(s.base_amount, dec!(200.00));
        assert_eq!(s.overdue_days, 0);
        assert_eq!(s.fine_amount, dec!(0));
        assert_eq!(s.total_amount, dec!(200.00));
    }

    #[test]
    fn test_early_return_still_bills_elapsed_days() {
        let s = settle(
            date(2024, 1, 1),
            date(2024, 1, 10),
            date(2024, 1, 5),
            dec!(50.00),
            dec!(10),
        );
        assert_eq!(s.total_days, 4);
        assert_eq!(s.overdue_days, 0);
        assert_eq!(s.total_amount, dec!(200.00));
    }

    #[test]
    fn test_late_return_three_days() {
        // Agreed Jan 1 to Jan 5, returned Jan 8: 7 billed days plus a
        // fine of 3 days x 50.00 x 10% = 15.00
        let s = settle(
            date(2024, 1, 1),
            date(2024, 1, 5),
            date(2024, 1, 8),
            dec!(50.00),
            dec!(10),
        );
        assert_eq!(s.total_days, 7);
        assert_eq!(s.base_amount, dec!(350.00));
        assert_eq!(s.overdue_days, 3);
        assert_eq!(s.fine_amount, dec!(15.00));
        assert_eq!(s.total_amount, dec!(365.00));
    }

    #[test]
    fn test_late_by_hours_counts_as_one_overdue_day() {
        let s = settle(
            date(2024, 1, 1),
            date(2024, 1, 5),
            datetime(2024, 1, 5, 6),
            dec!(50.00),
            dec!(10),
        );
        assert_eq!(s.total_days, 5);
        assert_eq!(s.overdue_days, 1);
        assert_eq!(s.fine_amount, dec!(5.00));
        assert_eq!(s.total_amount, dec!(255.00));
    }

    #[test]
    fn test_fine_uses_tenant_percent() {
        assert_eq!(overdue_fine(dec!(80.00), 2, dec!(25)), dec!(40.00));
        assert_eq!(overdue_fine(dec!(80.00), 0, dec!(25)), dec!(0));
    }

    #[test]
    fn test_fine_rounds_to_cents() {
        // 1 day x 33.33 x 10% = 3.333 -> 3.33
        assert_eq!(overdue_fine(dec!(33.33), 1, dec!(10)), dec!(3.33));
    }
}
