//! Payment repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locavia_core::{
    models::{Payment, PaymentMethod, PaymentStatus},
    traits::PaymentRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of PaymentRepository
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse payment status from string
    fn parse_status(s: &str) -> PaymentStatus {
        PaymentStatus::from_str(s).unwrap_or(PaymentStatus::Pending)
    }

    /// Parse payment method from string
    fn parse_method(s: &str) -> Option<PaymentMethod> {
        PaymentMethod::from_str(s)
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    #[instrument(skip(self))]
    async fn find_for_rental(&self, tenant_id: Uuid, rental_id: Uuid) -> AppResult<Vec<Payment>> {
        debug!(
            "Finding payments of rental {} for tenant {}",
            rental_id, tenant_id
        );

        let rows = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            SELECT id, tenant_id, rental_id, amount, status, payment_method,
                   payment_date, created_at, updated_at
            FROM payments
            WHERE tenant_id = $1 AND rental_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(rental_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error finding payments for rental {}: {}",
                rental_id, e
            );
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    tenant_id: Uuid,
    rental_id: Uuid,
    amount: Decimal,
    status: String,
    payment_method: Option<String>,
    payment_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            rental_id: row.rental_id,
            amount: row.amount,
            status: PgPaymentRepository::parse_status(&row.status),
            payment_method: row
                .payment_method
                .as_deref()
                .and_then(PgPaymentRepository::parse_method),
            payment_date: row.payment_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgPaymentRepository::parse_status("completed"),
            PaymentStatus::Completed
        );
        assert_eq!(
            PgPaymentRepository::parse_status("refunded"),
            PaymentStatus::Refunded
        );
        // unknown strings degrade to pending
        assert_eq!(
            PgPaymentRepository::parse_status("garbage"),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(
            PgPaymentRepository::parse_method("pix"),
            Some(PaymentMethod::Pix)
        );
        assert_eq!(PgPaymentRepository::parse_method("barter"), None);
    }
}
