//! Rental lifecycle manager
//!
//! Drives rental contracts through their lifecycle:
//! - Checkout: open a contract, mark the tool rented, create the receivable
//! - Check-in: settle billing with overdue fines, complete the payment,
//!   return the tool to the shelf
//! - Cancel: void a contract, fail its open receivable, free the tool
//!
//! Each operation runs in a single database transaction. Tool and rental
//! rows are locked with `SELECT ... FOR UPDATE` before their status is
//! inspected, so concurrent operations on the same tool or contract
//! serialize instead of double-booking. Status writes go through the
//! `can_transition_to` predicates; an illegal move aborts the transaction.

use chrono::{DateTime, Utc};
use locavia_core::{
    models::{Customer, Payment, PaymentMethod, PaymentStatus, Rental, RentalStatus, Tool, ToolStatus},
    traits::SettingsRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::billing;
use crate::constants::MAX_RENTAL_DAYS;
use crate::rental_code;

/// Checkout request handed to the manager
#[derive(Debug, Clone)]
pub struct CheckoutCommand {
    /// Tool to rent out
    pub tool_id: Uuid,

    /// Renting customer
    pub customer_id: Uuid,

    /// Contract start
    pub start_date: DateTime<Utc>,

    /// Agreed return date
    pub end_date_expected: DateTime<Utc>,

    /// Negotiated daily rate
    pub daily_rate_agreed: Decimal,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Check-in request handed to the manager
#[derive(Debug, Clone)]
pub struct CheckinCommand {
    /// When the tool actually came back
    pub end_date_actual: DateTime<Utc>,

    /// How the settled amount was paid
    pub payment_method: PaymentMethod,

    /// Notes appended to the contract
    pub notes: Option<String>,
}

/// Rental manager
///
/// Owns the lifecycle writes. Handlers and analytics read through the
/// repositories; nothing else writes rental, payment or tool status rows.
pub struct RentalManager<S: SettingsRepository> {
    settings_repo: Arc<S>,
    pool: Arc<PgPool>,
}

impl<S: SettingsRepository> RentalManager<S> {
    /// Create a new rental manager
    pub fn new(settings_repo: Arc<S>, pool: Arc<PgPool>) -> Self {
        Self {
            settings_repo,
            pool,
        }
    }

    /// Validate a checkout command before touching the database
    fn validate_checkout(cmd: &CheckoutCommand) -> AppResult<()> {
        if cmd.end_date_expected < cmd.start_date {
            return Err(AppError::Validation(
                "end_date_expected must not be before start_date".to_string(),
            ));
        }

        if cmd.daily_rate_agreed <= Decimal::ZERO {
            return Err(AppError::Validation(
                "daily_rate_agreed must be positive".to_string(),
            ));
        }

        let days = billing::days_between(cmd.start_date, cmd.end_date_expected);
        if days > MAX_RENTAL_DAYS {
            return Err(AppError::Validation(format!(
                "rental length of {} days exceeds the maximum of {}",
                days, MAX_RENTAL_DAYS
            )));
        }

        Ok(())
    }

    /// Open a new rental contract
    ///
    /// Locks the tool row before checking availability, draws the next
    /// rental code, inserts the contract with its expected billing and a
    /// pending payment, and flips the tool to rented. All or nothing.
    #[instrument(skip(self, cmd))]
    pub async fn checkout(
        &self,
        tenant_id: Uuid,
        actor: Uuid,
        cmd: CheckoutCommand,
    ) -> AppResult<Rental> {
        Self::validate_checkout(&cmd)?;

        info!(
            "Checkout for tenant {}: tool {}, customer {}",
            tenant_id, cmd.tool_id, cmd.customer_id
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Lock the tool row before the availability check
        let tool = lock_tool(&mut tx, tenant_id, cmd.tool_id).await?;

        if !tool.status.is_rentable() {
            warn!(
                "Tool {} refused for checkout: status {}",
                tool.id, tool.status
            );
            return Err(AppError::ToolUnavailable {
                tool: tool.name,
                status: tool.status.to_string(),
            });
        }

        let customer = find_customer(&mut tx, tenant_id, cmd.customer_id).await?;

        if !customer.can_rent() {
            warn!("Customer {} is blocked, refusing checkout", customer.id);
            return Err(AppError::CustomerBlocked(customer.name));
        }

        let code = rental_code::next_code(&mut tx, tenant_id).await?;
        let quote = billing::quote(cmd.start_date, cmd.end_date_expected, cmd.daily_rate_agreed);

        let rental = Rental::new(
            tenant_id,
            code,
            cmd.tool_id,
            cmd.customer_id,
            actor,
            cmd.start_date,
            cmd.end_date_expected,
            cmd.daily_rate_agreed,
            quote.total_days as i32,
            quote.total_amount,
            cmd.notes,
        );

        sqlx::query(
            r#"
            INSERT INTO rentals (
                id, tenant_id, rental_code, tool_id, customer_id, created_by,
                start_date, end_date_expected, daily_rate_agreed,
                total_days_expected, total_amount_expected, overdue_fine_amount,
                status, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(rental.id)
        .bind(rental.tenant_id)
        .bind(&rental.rental_code)
        .bind(rental.tool_id)
        .bind(rental.customer_id)
        .bind(rental.created_by)
        .bind(rental.start_date)
        .bind(rental.end_date_expected)
        .bind(rental.daily_rate_agreed)
        .bind(rental.total_days_expected)
        .bind(rental.total_amount_expected)
        .bind(rental.overdue_fine_amount)
        .bind(rental.status.to_string())
        .bind(&rental.notes)
        .bind(rental.created_at)
        .bind(rental.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert rental: {}", e);
            AppError::Database(format!("Failed to insert rental: {}", e))
        })?;

        transition_tool(&mut tx, tenant_id, tool.id, tool.status, ToolStatus::Rented).await?;

        let payment = Payment::pending(tenant_id, rental.id, rental.total_amount_expected);
        insert_payment(&mut tx, &payment).await?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Checked out rental {} ({} days, {}) for tool {}",
            rental.rental_code, rental.total_days_expected, rental.total_amount_expected, tool.id
        );

        Ok(rental)
    }

    /// Settle and close an active rental
    ///
    /// Computes the actual billing from the real return date, applies the
    /// tenant's overdue fine, completes the pending payment (or records a
    /// completed one if the receivable is missing) and frees the tool.
    #[instrument(skip(self, cmd))]
    pub async fn check_in(
        &self,
        tenant_id: Uuid,
        rental_id: Uuid,
        actor: Uuid,
        cmd: CheckinCommand,
    ) -> AppResult<Rental> {
        let settings = self.settings_repo.get(tenant_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        let mut rental = lock_rental(&mut tx, tenant_id, rental_id).await?;

        if !rental.status.can_transition_to(RentalStatus::Returned) {
            warn!(
                "Rental {} cannot be checked in from status {}",
                rental.rental_code, rental.status
            );
            return Err(AppError::RentalClosed {
                rental: rental.rental_code,
                status: rental.status.to_string(),
            });
        }

        if cmd.end_date_actual < rental.start_date {
            return Err(AppError::Validation(
                "end_date_actual must not be before start_date".to_string(),
            ));
        }

        let settlement = billing::settle(
            rental.start_date,
            rental.end_date_expected,
            cmd.end_date_actual,
            rental.daily_rate_agreed,
            settings.overdue_fine_percent,
        );

        if settlement.overdue_days > 0 {
            info!(
                "Rental {} is {} days overdue, fine {}",
                rental.rental_code, settlement.overdue_days, settlement.fine_amount
            );
        }

        let notes = merge_notes(rental.notes.take(), cmd.notes.as_deref());

        sqlx::query(
            r#"
            UPDATE rentals
            SET status = 'returned',
                end_date_actual = $3,
                total_days_actual = $4,
                total_amount_actual = $5,
                overdue_fine_amount = $6,
                notes = $7,
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(rental_id)
        .bind(cmd.end_date_actual)
        .bind(settlement.total_days as i32)
        .bind(settlement.total_amount)
        .bind(settlement.fine_amount)
        .bind(&notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to settle rental {}: {}", rental_id, e);
            AppError::Database(format!("Failed to settle rental: {}", e))
        })?;

        settle_payment(
            &mut tx,
            tenant_id,
            rental_id,
            settlement.total_amount,
            cmd.payment_method,
        )
        .await?;

        let tool = lock_tool(&mut tx, tenant_id, rental.tool_id).await?;
        transition_tool(&mut tx, tenant_id, tool.id, tool.status, ToolStatus::Available).await?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        rental.status = RentalStatus::Returned;
        rental.end_date_actual = Some(cmd.end_date_actual);
        rental.total_days_actual = Some(settlement.total_days as i32);
        rental.total_amount_actual = Some(settlement.total_amount);
        rental.overdue_fine_amount = settlement.fine_amount;
        rental.notes = notes;
        rental.updated_at = Utc::now();

        info!(
            "Checked in rental {} by {}: {} days, total {}, fine {}",
            rental.rental_code,
            actor,
            settlement.total_days,
            settlement.total_amount,
            settlement.fine_amount
        );

        Ok(rental)
    }

    /// Void an active rental
    ///
    /// The contract keeps its expected amounts for the record, its pending
    /// payment is marked failed, and the tool goes back on the shelf.
    /// Returned and already-cancelled contracts cannot be cancelled.
    #[instrument(skip(self))]
    pub async fn cancel(&self, tenant_id: Uuid, rental_id: Uuid) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        let mut rental = lock_rental(&mut tx, tenant_id, rental_id).await?;

        if !rental.status.can_transition_to(RentalStatus::Cancelled) {
            warn!(
                "Rental {} cannot be cancelled from status {}",
                rental.rental_code, rental.status
            );
            return Err(AppError::RentalClosed {
                rental: rental.rental_code,
                status: rental.status.to_string(),
            });
        }

        sqlx::query(
            r#"
            UPDATE rentals
            SET status = 'cancelled', updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(rental_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to cancel rental {}: {}", rental_id, e);
            AppError::Database(format!("Failed to cancel rental: {}", e))
        })?;

        // A dead contract keeps no live receivable
        let voided = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'failed', updated_at = NOW()
            WHERE tenant_id = $1 AND rental_id = $2 AND status = 'pending'
            "#,
        )
        .bind(tenant_id)
        .bind(rental_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to void payments for rental {}: {}", rental_id, e);
            AppError::Database(format!("Failed to void payments: {}", e))
        })?;

        debug!(
            "Voided {} pending payment(s) for rental {}",
            voided.rows_affected(),
            rental.rental_code
        );

        let tool = lock_tool(&mut tx, tenant_id, rental.tool_id).await?;
        transition_tool(&mut tx, tenant_id, tool.id, tool.status, ToolStatus::Available).await?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        rental.status = RentalStatus::Cancelled;
        rental.updated_at = Utc::now();

        info!("Cancelled rental {}", rental.rental_code);

        Ok(rental)
    }
}

/// Append check-in notes to the existing contract notes
fn merge_notes(existing: Option<String>, extra: Option<&str>) -> Option<String> {
    match (existing, extra) {
        (current, None) => current,
        (None, Some(extra)) => Some(extra.to_string()),
        (Some(current), Some(extra)) => Some(format!("{}\n{}", current, extra)),
    }
}

/// Lock a tool row for the remainder of the transaction
async fn lock_tool(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: Uuid,
    tool_id: Uuid,
) -> AppResult<Tool> {
    let row = sqlx::query_as::<sqlx::Postgres, ToolRow>(
        r#"
        SELECT id, tenant_id, name, description, daily_rate, acquisition_cost,
               acquisition_date, current_usage_hours, usage_hours_limit,
               maintenance_interval_days, maintenance_interval_rentals,
               last_maintenance_at, status, created_at, updated_at
        FROM tools
        WHERE tenant_id = $1 AND id = $2
        FOR UPDATE
        "#,
    )
    .bind(tenant_id)
    .bind(tool_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to lock tool {}: {}", tool_id, e);
        AppError::Database(format!("Failed to lock tool: {}", e))
    })?
    .ok_or_else(|| AppError::ToolNotFound(tool_id.to_string()))?;

    Ok(row.into())
}

/// Lock a rental row for the remainder of the transaction
async fn lock_rental(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: Uuid,
    rental_id: Uuid,
) -> AppResult<Rental> {
    let row = sqlx::query_as::<sqlx::Postgres, RentalRow>(
        r#"
        SELECT id, tenant_id, rental_code, tool_id, customer_id, created_by,
               start_date, end_date_expected, end_date_actual,
               daily_rate_agreed, total_days_expected, total_days_actual,
               total_amount_expected, total_amount_actual, overdue_fine_amount,
               status, notes, created_at, updated_at
        FROM rentals
        WHERE tenant_id = $1 AND id = $2
        FOR UPDATE
        "#,
    )
    .bind(tenant_id)
    .bind(rental_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to lock rental {}: {}", rental_id, e);
        AppError::Database(format!("Failed to lock rental: {}", e))
    })?
    .ok_or_else(|| AppError::RentalNotFound(rental_id.to_string()))?;

    Ok(row.into())
}

/// Load a customer inside the transaction
async fn find_customer(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: Uuid,
    customer_id: Uuid,
) -> AppResult<Customer> {
    let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(
        r#"
        SELECT id, tenant_id, name, document, email, phone, is_blocked,
               created_at, updated_at
        FROM customers
        WHERE tenant_id = $1 AND id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(customer_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to load customer {}: {}", customer_id, e);
        AppError::Database(format!("Failed to load customer: {}", e))
    })?
    .ok_or_else(|| AppError::CustomerNotFound(customer_id.to_string()))?;

    Ok(row.into())
}

/// Apply a tool status transition, rejecting illegal moves
async fn transition_tool(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: Uuid,
    tool_id: Uuid,
    from: ToolStatus,
    to: ToolStatus,
) -> AppResult<()> {
    if !from.can_transition_to(to) {
        error!("Illegal tool transition for {}: {} -> {}", tool_id, from, to);
        return Err(AppError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    sqlx::query(
        r#"
        UPDATE tools
        SET status = $3, updated_at = NOW()
        WHERE tenant_id = $1 AND id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(tool_id)
    .bind(to.to_string())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to update tool {} status: {}", tool_id, e);
        AppError::Database(format!("Failed to update tool status: {}", e))
    })?;

    Ok(())
}

/// Insert a payment ledger row
async fn insert_payment(tx: &mut Transaction<'_, Postgres>, payment: &Payment) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, tenant_id, rental_id, amount, payment_method, status,
            payment_date, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(payment.id)
    .bind(payment.tenant_id)
    .bind(payment.rental_id)
    .bind(payment.amount)
    .bind(payment.payment_method.map(|m| m.to_string()))
    .bind(payment.status.to_string())
    .bind(payment.payment_date)
    .bind(payment.created_at)
    .bind(payment.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to insert payment: {}", e);
        AppError::Database(format!("Failed to insert payment: {}", e))
    })?;

    Ok(())
}

/// Complete the rental's pending payment with the settled amount
///
/// The pending receivable is updated in place. A rental without one (data
/// imported from elsewhere, or a voided ledger) still gets its settlement
/// recorded as a fresh completed payment.
async fn settle_payment(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: Uuid,
    rental_id: Uuid,
    amount: Decimal,
    method: PaymentMethod,
) -> AppResult<()> {
    let pending: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id FROM payments
        WHERE tenant_id = $1 AND rental_id = $2 AND status = 'pending'
        ORDER BY created_at ASC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(tenant_id)
    .bind(rental_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| {
        error!("Failed to find pending payment: {}", e);
        AppError::Database(format!("Failed to find pending payment: {}", e))
    })?;

    match pending {
        Some((payment_id,)) => {
            sqlx::query(
                r#"
                UPDATE payments
                SET status = 'completed',
                    amount = $2,
                    payment_method = $3,
                    payment_date = NOW(),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(payment_id)
            .bind(amount)
            .bind(method.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                error!("Failed to complete payment {}: {}", payment_id, e);
                AppError::Database(format!("Failed to complete payment: {}", e))
            })?;
        }
        None => {
            warn!(
                "Rental {} has no pending payment, recording settlement directly",
                rental_id
            );

            let mut payment = Payment::pending(tenant_id, rental_id, amount);
            payment.status = PaymentStatus::Completed;
            payment.payment_method = Some(method);
            payment.payment_date = Some(Utc::now());
            insert_payment(tx, &payment).await?;
        }
    }

    Ok(())
}

/// Helper struct for tool row mapping
#[derive(Debug, sqlx::FromRow)]
struct ToolRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    description: Option<String>,
    daily_rate: Decimal,
    acquisition_cost: Decimal,
    acquisition_date: Option<DateTime<Utc>>,
    current_usage_hours: i32,
    usage_hours_limit: Option<i32>,
    maintenance_interval_days: Option<i32>,
    maintenance_interval_rentals: Option<i32>,
    last_maintenance_at: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ToolRow> for Tool {
    fn from(row: ToolRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            description: row.description,
            daily_rate: row.daily_rate,
            acquisition_cost: row.acquisition_cost,
            acquisition_date: row.acquisition_date,
            current_usage_hours: row.current_usage_hours,
            usage_hours_limit: row.usage_hours_limit,
            maintenance_interval_days: row.maintenance_interval_days,
            maintenance_interval_rentals: row.maintenance_interval_rentals,
            last_maintenance_at: row.last_maintenance_at,
            status: ToolStatus::from_str(&row.status).unwrap_or(ToolStatus::Unavailable),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Helper struct for rental row mapping
#[derive(Debug, sqlx::FromRow)]
struct RentalRow {
    id: Uuid,
    tenant_id: Uuid,
    rental_code: String,
    tool_id: Uuid,
    customer_id: Uuid,
    created_by: Uuid,
    start_date: DateTime<Utc>,
    end_date_expected: DateTime<Utc>,
    end_date_actual: Option<DateTime<Utc>>,
    daily_rate_agreed: Decimal,
    total_days_expected: i32,
    total_days_actual: Option<i32>,
    total_amount_expected: Decimal,
    total_amount_actual: Option<Decimal>,
    overdue_fine_amount: Decimal,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RentalRow> for Rental {
    fn from(row: RentalRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            rental_code: row.rental_code,
            tool_id: row.tool_id,
            customer_id: row.customer_id,
            created_by: row.created_by,
            start_date: row.start_date,
            end_date_expected: row.end_date_expected,
            end_date_actual: row.end_date_actual,
            daily_rate_agreed: row.daily_rate_agreed,
            total_days_expected: row.total_days_expected,
            total_days_actual: row.total_days_actual,
            total_amount_expected: row.total_amount_expected,
            total_amount_actual: row.total_amount_actual,
            overdue_fine_amount: row.overdue_fine_amount,
            status: RentalStatus::from_str(&row.status).unwrap_or(RentalStatus::Active),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Helper struct for customer row mapping
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    document: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    is_blocked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            document: row.document,
            email: row.email,
            phone: row.phone,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample_command() -> CheckoutCommand {
        let start = Utc::now();
        CheckoutCommand {
            tool_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            start_date: start,
            end_date_expected: start + Duration::days(4),
            daily_rate_agreed: dec!(50.00),
            notes: None,
        }
    }

    #[test]
    fn test_validate_checkout_accepts_sane_command() {
        assert!(crate::PgRentalManager::validate_checkout(&sample_command()).is_ok());
    }

    #[test]
    fn test_validate_checkout_rejects_inverted_dates() {
        let mut cmd = sample_command();
        cmd.end_date_expected = cmd.start_date - Duration::days(1);

        let err = crate::PgRentalManager::validate_checkout(&cmd).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_checkout_rejects_nonpositive_rate() {
        let mut cmd = sample_command();
        cmd.daily_rate_agreed = Decimal::ZERO;
        assert!(crate::PgRentalManager::validate_checkout(&cmd).is_err());

        cmd.daily_rate_agreed = dec!(-5.00);
        assert!(crate::PgRentalManager::validate_checkout(&cmd).is_err());
    }

    #[test]
    fn test_validate_checkout_rejects_excessive_length() {
        let mut cmd = sample_command();
        cmd.end_date_expected = cmd.start_date + Duration::days(MAX_RENTAL_DAYS + 1);

        let err = crate::PgRentalManager::validate_checkout(&cmd).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_merge_notes() {
        assert_eq!(merge_notes(None, None), None);
        assert_eq!(
            merge_notes(Some("kept".to_string()), None),
            Some("kept".to_string())
        );
        assert_eq!(
            merge_notes(None, Some("added")),
            Some("added".to_string())
        );
        assert_eq!(
            merge_notes(Some("first".to_string()), Some("second")),
            Some("first\nsecond".to_string())
        );
    }
}
