//! Rental DTOs
//!
//! Request and response types for the rental lifecycle endpoints.

use chrono::{DateTime, Utc};
use locavia_core::models::{PaymentMethod, Rental};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use locavia_services::{CheckinCommand, CheckoutCommand};

/// Checkout request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRentalRequest {
    /// Tool to rent out
    pub tool_id: Uuid,

    /// Renting customer
    pub customer_id: Uuid,

    /// Contract start
    pub start_date: DateTime<Utc>,

    /// Agreed return date (must not precede the start, validated in the manager)
    pub end_date_expected: DateTime<Utc>,

    /// Negotiated daily rate (must be positive, validated in the manager)
    pub daily_rate_agreed: Decimal,

    /// Free-form contract notes
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateRentalRequest {
    /// Convert to a checkout command
    pub fn to_command(&self) -> CheckoutCommand {
        CheckoutCommand {
            tool_id: self.tool_id,
            customer_id: self.customer_id,
            start_date: self.start_date,
            end_date_expected: self.end_date_expected,
            daily_rate_agreed: self.daily_rate_agreed,
            notes: self.notes.clone(),
        }
    }
}

/// Check-in request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckinRentalRequest {
    /// When the tool actually came back
    pub end_date_actual: DateTime<Utc>,

    /// How the settled amount was paid
    pub payment_method: PaymentMethod,

    /// Notes appended to the contract
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CheckinRentalRequest {
    /// Convert to a check-in command
    pub fn to_command(&self) -> CheckinCommand {
        CheckinCommand {
            end_date_actual: self.end_date_actual,
            payment_method: self.payment_method,
            notes: self.notes.clone(),
        }
    }
}

/// Filter parameters for the rental list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RentalFilterParams {
    /// Filter by contract status (active/returned/cancelled)
    pub status: Option<String>,

    /// Filter by tool
    pub tool_id: Option<Uuid>,

    /// Filter by customer
    pub customer_id: Option<Uuid>,

    /// Keep only active rentals past their agreed return date
    #[serde(default)]
    pub overdue: bool,
}

/// Rental response
#[derive(Debug, Clone, Serialize)]
pub struct RentalResponse {
    /// Rental ID
    pub id: Uuid,

    /// Human-facing rental code
    pub rental_code: String,

    /// Rented tool
    pub tool_id: Uuid,

    /// Renting customer
    pub customer_id: Uuid,

    /// Contract start
    pub start_date: DateTime<Utc>,

    /// Agreed return date
    pub end_date_expected: DateTime<Utc>,

    /// Actual return date, set at check-in
    pub end_date_actual: Option<DateTime<Utc>>,

    /// Negotiated daily rate
    pub daily_rate_agreed: f64,

    /// Billable days agreed at checkout
    pub total_days_expected: i32,

    /// Billable days settled at check-in
    pub total_days_actual: Option<i32>,

    /// Amount agreed at checkout
    pub total_amount_expected: f64,

    /// Amount settled at check-in, fine included
    pub total_amount_actual: Option<f64>,

    /// Overdue fine portion of the settled amount
    pub overdue_fine_amount: f64,

    /// Contract status
    pub status: String,

    /// Whether the contract is active and past its agreed return date
    pub overdue: bool,

    /// Contract notes
    pub notes: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Rental> for RentalResponse {
    fn from(rental: Rental) -> Self {
        let overdue = rental.is_overdue();

        Self {
            id: rental.id,
            rental_code: rental.rental_code,
            tool_id: rental.tool_id,
            customer_id: rental.customer_id,
            start_date: rental.start_date,
            end_date_expected: rental.end_date_expected,
            end_date_actual: rental.end_date_actual,
            daily_rate_agreed: rental.daily_rate_agreed.to_f64().unwrap_or(0.0),
            total_days_expected: rental.total_days_expected,
            total_days_actual: rental.total_days_actual,
            total_amount_expected: rental.total_amount_expected.to_f64().unwrap_or(0.0),
            total_amount_actual: rental
                .total_amount_actual
                .map(|amount| amount.to_f64().unwrap_or(0.0)),
            overdue_fine_amount: rental.overdue_fine_amount.to_f64().unwrap_or(0.0),
            status: rental.status.to_string(),
            overdue,
            notes: rental.notes,
            created_at: rental.created_at,
            updated_at: rental.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_notes_length_is_bounded() {
        let req = CreateRentalRequest {
            tool_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            start_date: Utc::now(),
            end_date_expected: Utc::now(),
            daily_rate_agreed: dec!(50),
            notes: Some("x".repeat(1001)),
        };
        assert!(req.validate().is_err());

        let req = CreateRentalRequest {
            notes: Some("returned dirty".to_string()),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_checkin_request_parses_payment_method() {
        let req: CheckinRentalRequest = serde_json::from_str(
            r#"{"end_date_actual": "2024-01-05T08:00:00Z", "payment_method": "credit_card"}"#,
        )
        .unwrap();

        assert_eq!(req.payment_method, PaymentMethod::CreditCard);
        assert!(req.notes.is_none());
    }
}
