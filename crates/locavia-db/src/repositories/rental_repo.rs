//! Rental repository implementation
//!
//! Read paths for rental contracts. All lifecycle writes go through the
//! rental manager's transactions; this repository only serves listings,
//! lookups and the expiring/availability feeds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locavia_core::{
    models::{Rental, RentalStatus},
    traits::{RentalFilter, RentalRepository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

const RENTAL_COLUMNS: &str = r#"
    id, tenant_id, rental_code, tool_id, customer_id, created_by,
    start_date, end_date_expected, end_date_actual,
    daily_rate_agreed, total_days_expected, total_days_actual,
    total_amount_expected, total_amount_actual, overdue_fine_amount,
    status, notes, created_at, updated_at
"#;

/// PostgreSQL implementation of RentalRepository
pub struct PgRentalRepository {
    pool: PgPool,
}

impl PgRentalRepository {
    /// Create a new rental repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse rental status from string
    fn parse_status(s: &str) -> RentalStatus {
        RentalStatus::from_str(s).unwrap_or(RentalStatus::Active)
    }

    /// Build the WHERE clause shared by `list` and its count query
    ///
    /// Returns the clause and the number of bind placeholders it uses,
    /// starting from `$1` (tenant_id). Values must be bound in the same
    /// order the clauses were appended.
    fn filter_clause(filter: &RentalFilter) -> (String, usize) {
        let mut clause = String::from("tenant_id = $1");
        let mut binds = 1;

        if filter.status.is_some() {
            binds += 1;
            clause.push_str(&format!(" AND status = ${}", binds));
        }

        if filter.tool_id.is_some() {
            binds += 1;
            clause.push_str(&format!(" AND tool_id = ${}", binds));
        }

        if filter.customer_id.is_some() {
            binds += 1;
            clause.push_str(&format!(" AND customer_id = ${}", binds));
        }

        if filter.overdue_only {
            clause.push_str(" AND status = 'active' AND end_date_expected < NOW()");
        }

        (clause, binds)
    }
}

#[async_trait]
impl RentalRepository for PgRentalRepository {
    #[instrument(skip(self))]
    async fn find(&self, tenant_id: Uuid, id: Uuid) -> AppResult<Option<Rental>> {
        debug!("Finding rental {} for tenant {}", id, tenant_id);

        let sql = format!(
            "SELECT {} FROM rentals WHERE tenant_id = $1 AND id = $2",
            RENTAL_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, RentalRow>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding rental {}: {}", id, e);
                AppError::Database(format!("Failed to find rental: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        tenant_id: Uuid,
        filter: &RentalFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Rental>, i64)> {
        debug!(
            "Listing rentals for tenant {} with filter {:?}, limit {} offset {}",
            tenant_id, filter, limit, offset
        );

        let (clause, binds) = Self::filter_clause(filter);

        let list_sql = format!(
            "SELECT {} FROM rentals WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            RENTAL_COLUMNS,
            clause,
            binds + 1,
            binds + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM rentals WHERE {}", clause);

        let mut list_query = sqlx::query_as::<sqlx::Postgres, RentalRow>(&list_sql).bind(tenant_id);
        let mut count_query = sqlx::query_as::<sqlx::Postgres, (i64,)>(&count_sql).bind(tenant_id);

        if let Some(status) = filter.status {
            list_query = list_query.bind(status.to_string());
            count_query = count_query.bind(status.to_string());
        }
        if let Some(tool_id) = filter.tool_id {
            list_query = list_query.bind(tool_id);
            count_query = count_query.bind(tool_id);
        }
        if let Some(customer_id) = filter.customer_id {
            list_query = list_query.bind(customer_id);
            count_query = count_query.bind(customer_id);
        }

        let total: (i64,) = count_query.fetch_one(&self.pool).await.map_err(|e| {
            error!("Database error counting rentals: {}", e);
            AppError::Database(format!("Failed to count rentals: {}", e))
        })?;

        let rows = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing rentals: {}", e);
                AppError::Database(format!("Failed to fetch rentals: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn find_for_tool(&self, tenant_id: Uuid, tool_id: Uuid) -> AppResult<Vec<Rental>> {
        debug!("Finding rentals of tool {} for tenant {}", tool_id, tenant_id);

        let sql = format!(
            r#"
            SELECT {}
            FROM rentals
            WHERE tenant_id = $1 AND tool_id = $2 AND status <> 'cancelled'
            ORDER BY start_date DESC
            "#,
            RENTAL_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, RentalRow>(&sql)
            .bind(tenant_id)
            .bind(tool_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding rentals for tool {}: {}", tool_id, e);
                AppError::Database(format!("Failed to fetch tool rentals: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_expiring(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Rental>> {
        debug!(
            "Finding rentals for tenant {} expiring between {} and {}",
            tenant_id, from, to
        );

        let sql = format!(
            r#"
            SELECT {}
            FROM rentals
            WHERE tenant_id = $1
                AND status = 'active'
                AND end_date_expected >= $2
                AND end_date_expected <= $3
            ORDER BY end_date_expected ASC
            "#,
            RENTAL_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, RentalRow>(&sql)
            .bind(tenant_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding expiring rentals: {}", e);
                AppError::Database(format!("Failed to fetch expiring rentals: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RentalRow {
    pub(crate) id: Uuid,
    pub(crate) tenant_id: Uuid,
    pub(crate) rental_code: String,
    pub(crate) tool_id: Uuid,
    pub(crate) customer_id: Uuid,
    pub(crate) created_by: Uuid,
    pub(crate) start_date: DateTime<Utc>,
    pub(crate) end_date_expected: DateTime<Utc>,
    pub(crate) end_date_actual: Option<DateTime<Utc>>,
    pub(crate) daily_rate_agreed: Decimal,
    pub(crate) total_days_expected: i32,
    pub(crate) total_days_actual: Option<i32>,
    pub(crate) total_amount_expected: Decimal,
    pub(crate) total_amount_actual: Option<Decimal>,
    pub(crate) overdue_fine_amount: Decimal,
    pub(crate) status: String,
    pub(crate) notes: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
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
            status: PgRentalRepository::parse_status(&row.status),
            notes: row.notes,
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
            PgRentalRepository::parse_status("active"),
            RentalStatus::Active
        );
        assert_eq!(
            PgRentalRepository::parse_status("returned"),
            RentalStatus::Returned
        );
        assert_eq!(
            PgRentalRepository::parse_status("cancelled"),
            RentalStatus::Cancelled
        );
    }

    #[test]
    fn test_filter_clause_unfiltered() {
        let (clause, binds) = PgRentalRepository::filter_clause(&RentalFilter::default());
        assert_eq!(clause, "tenant_id = $1");
        assert_eq!(binds, 1);
    }

    #[test]
    fn test_filter_clause_full() {
        let filter = RentalFilter {
            status: Some(RentalStatus::Active),
            tool_id: Some(Uuid::new_v4()),
            customer_id: Some(Uuid::new_v4()),
            overdue_only: true,
        };

        let (clause, binds) = PgRentalRepository::filter_clause(&filter);
        assert_eq!(binds, 4);
        assert!(clause.contains("status = $2"));
        assert!(clause.contains("tool_id = $3"));
        assert!(clause.contains("customer_id = $4"));
        assert!(clause.contains("end_date_expected < NOW()"));
    }
}
