//! Payment ledger models
//!
//! Every rental carries exactly one pending payment from checkout until
//! settlement. Rows are never deleted: reconciliation flips the status and
//! adjusts the amount, keeping the ledger auditable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payment settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Receivable created at checkout, amount still provisional
    #[default]
    Pending,
    /// Settled at check-in with the final amount
    Completed,
    /// Voided (e.g. the rental was cancelled)
    Failed,
    /// Money returned after completion
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl PaymentStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    /// Check if the payment is still an open receivable
    pub fn is_open(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }

    /// Check whether a transition to `next` is legal
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed | PaymentStatus::Failed)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        )
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    BankTransfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::CreditCard => write!(f, "credit_card"),
            PaymentMethod::DebitCard => write!(f, "debit_card"),
            PaymentMethod::Pix => write!(f, "pix"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
        }
    }
}

impl PaymentMethod {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "credit_card" => Some(PaymentMethod::CreditCard),
            "debit_card" => Some(PaymentMethod::DebitCard),
            "pix" => Some(PaymentMethod::Pix),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }
}

/// Payment ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Associated rental
    pub rental_id: Uuid,

    /// Amount due or settled
    pub amount: Decimal,

    /// Method used to settle (unknown while pending)
    pub payment_method: Option<PaymentMethod>,

    /// Settlement status
    pub status: PaymentStatus,

    /// When the payment was settled
    pub payment_date: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Create the pending receivable for a freshly checked-out rental
    pub fn pending(tenant_id: Uuid, rental_id: Uuid, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            rental_id,
            amount,
            payment_method: None,
            status: PaymentStatus::Pending,
            payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pending_payment() {
        let payment = Payment::pending(Uuid::new_v4(), Uuid::new_v4(), dec!(200.00));
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.status.is_open());
        assert!(payment.payment_method.is_none());
        assert!(payment.payment_date.is_none());
        assert_eq!(payment.amount, dec!(200.00));
    }

    #[test]
    fn test_status_transitions() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(PaymentStatus::Completed.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Completed));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Pending));
    }

    #[test]
    fn test_method_roundtrip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Pix,
            PaymentMethod::BankTransfer,
        ] {
            assert_eq!(PaymentMethod::from_str(&method.to_string()), Some(method));
        }
        assert_eq!(PaymentMethod::from_str("check"), None);
    }
}
