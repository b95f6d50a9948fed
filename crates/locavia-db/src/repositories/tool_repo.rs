//! Tool repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locavia_core::{
    models::{Tool, ToolStatus},
    traits::ToolRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of ToolRepository
pub struct PgToolRepository {
    pool: PgPool,
}

impl PgToolRepository {
    /// Create a new tool repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse tool status from string
    fn parse_status(s: &str) -> ToolStatus {
        ToolStatus::from_str(s).unwrap_or(ToolStatus::Unavailable)
    }
}

#[async_trait]
impl ToolRepository for PgToolRepository {
    #[instrument(skip(self))]
    async fn find(&self, tenant_id: Uuid, id: Uuid) -> AppResult<Option<Tool>> {
        debug!("Finding tool {} for tenant {}", id, tenant_id);

        let result = sqlx::query_as::<sqlx::Postgres, ToolRow>(
            r#"
            SELECT
                id, tenant_id, name, description,
                daily_rate, acquisition_cost, acquisition_date,
                current_usage_hours, usage_hours_limit,
                maintenance_interval_days, maintenance_interval_rentals,
                last_maintenance_at, status, created_at, updated_at
            FROM tools
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding tool {}: {}", id, e);
            AppError::Database(format!("Failed to find tool: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
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
            status: PgToolRepository::parse_status(&row.status),
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
            PgToolRepository::parse_status("available"),
            ToolStatus::Available
        );
        assert_eq!(PgToolRepository::parse_status("rented"), ToolStatus::Rented);
        assert_eq!(PgToolRepository::parse_status("sold"), ToolStatus::Sold);
        // unknown strings degrade to unavailable
        assert_eq!(
            PgToolRepository::parse_status("garbage"),
            ToolStatus::Unavailable
        );
    }
}
