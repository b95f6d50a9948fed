//! Rental contract models
//!
//! A rental binds one tool to one customer for a period. The lifecycle is a
//! closed state machine: `Active` is the only open state, and the only legal
//! moves are check-in (`Returned`) and cancellation (`Cancelled`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Rental contract status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// Contract is open, tool is out
    #[default]
    Active,
    /// Tool came back, billing settled
    Returned,
    /// Contract voided before return
    Cancelled,
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalStatus::Active => write!(f, "active"),
            RentalStatus::Returned => write!(f, "returned"),
            RentalStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl RentalStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(RentalStatus::Active),
            "returned" => Some(RentalStatus::Returned),
            "cancelled" => Some(RentalStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if the contract is still open
    pub fn is_open(&self) -> bool {
        matches!(self, RentalStatus::Active)
    }

    /// Check if the contract reached a terminal state
    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }

    /// Check whether a transition to `next` is legal
    ///
    /// Terminal states admit nothing, including repeated cancellation.
    pub fn can_transition_to(self, next: RentalStatus) -> bool {
        matches!(
            (self, next),
            (RentalStatus::Active, RentalStatus::Returned | RentalStatus::Cancelled)
        )
    }
}

/// Rental contract entity
///
/// Monetary fields are split into the expected side (frozen at checkout)
/// and the actual side (filled at check-in). `daily_rate_agreed` is copied
/// from the tool at checkout so later rate changes never reprice an open
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Human-facing code, unique per tenant (e.g. "AL0042")
    pub rental_code: String,

    /// Rented tool
    pub tool_id: Uuid,

    /// Renting customer
    pub customer_id: Uuid,

    /// Operator who performed the checkout
    pub created_by: Uuid,

    /// Contract start
    pub start_date: DateTime<Utc>,

    /// Agreed return date
    pub end_date_expected: DateTime<Utc>,

    /// Actual return date (set at check-in)
    pub end_date_actual: Option<DateTime<Utc>>,

    /// Daily rate frozen at checkout
    pub daily_rate_agreed: Decimal,

    /// Billable days agreed at checkout
    pub total_days_expected: i32,

    /// Billable days computed at check-in
    pub total_days_actual: Option<i32>,

    /// Amount quoted at checkout
    pub total_amount_expected: Decimal,

    /// Amount settled at check-in (includes fine)
    pub total_amount_actual: Option<Decimal>,

    /// Overdue fine portion of the settled amount
    pub overdue_fine_amount: Decimal,

    /// Current status
    pub status: RentalStatus,

    /// Free-form notes
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    /// Create a new active rental at checkout
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        rental_code: String,
        tool_id: Uuid,
        customer_id: Uuid,
        created_by: Uuid,
        start_date: DateTime<Utc>,
        end_date_expected: DateTime<Utc>,
        daily_rate_agreed: Decimal,
        total_days_expected: i32,
        total_amount_expected: Decimal,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            rental_code,
            tool_id,
            customer_id,
            created_by,
            start_date,
            end_date_expected,
            end_date_actual: None,
            daily_rate_agreed,
            total_days_expected,
            total_days_actual: None,
            total_amount_expected,
            total_amount_actual: None,
            overdue_fine_amount: Decimal::ZERO,
            status: RentalStatus::Active,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the rental is open and past its agreed return date
    pub fn is_overdue(&self) -> bool {
        self.status.is_open() && Utc::now() > self.end_date_expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample_rental() -> Rental {
        Rental::new(
            Uuid::new_v4(),
            "AL0001".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() - Duration::days(5),
            Utc::now() - Duration::days(1),
            dec!(50.00),
            4,
            dec!(200.00),
            None,
        )
    }

    #[test]
    fn test_new_rental_is_active() {
        let rental = sample_rental();
        assert_eq!(rental.status, RentalStatus::Active);
        assert_eq!(rental.overdue_fine_amount, Decimal::ZERO);
        assert!(rental.end_date_actual.is_none());
        assert!(rental.total_amount_actual.is_none());
    }

    #[test]
    fn test_overdue_detection() {
        let mut rental = sample_rental();
        assert!(rental.is_overdue());

        rental.end_date_expected = Utc::now() + Duration::days(1);
        assert!(!rental.is_overdue());

        rental.end_date_expected = Utc::now() - Duration::days(1);
        rental.status = RentalStatus::Returned;
        assert!(!rental.is_overdue());
    }

    #[test]
    fn test_status_transitions() {
        assert!(RentalStatus::Active.can_transition_to(RentalStatus::Returned));
        assert!(RentalStatus::Active.can_transition_to(RentalStatus::Cancelled));
        assert!(!RentalStatus::Returned.can_transition_to(RentalStatus::Cancelled));
        assert!(!RentalStatus::Cancelled.can_transition_to(RentalStatus::Cancelled));
        assert!(!RentalStatus::Returned.can_transition_to(RentalStatus::Active));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            RentalStatus::Active,
            RentalStatus::Returned,
            RentalStatus::Cancelled,
        ] {
            assert_eq!(RentalStatus::from_str(&status.to_string()), Some(status));
        }
        assert_eq!(RentalStatus::from_str("open"), None);
    }
}
