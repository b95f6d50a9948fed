//! Tenant settings repository implementation
//!
//! Settings rows are optional: tenants that never customized anything have
//! no row, so lookups fall back to the documented defaults.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locavia_core::{
    models::{PlanTier, TenantSettings},
    traits::SettingsRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of SettingsRepository
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new settings repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse plan tier from string
    fn parse_tier(s: &str) -> PlanTier {
        PlanTier::from_str(s).unwrap_or(PlanTier::Starter)
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn get(&self, tenant_id: Uuid) -> AppResult<TenantSettings> {
        debug!("Loading settings for tenant {}", tenant_id);

        let row = sqlx::query_as::<sqlx::Postgres, SettingsRow>(
            r#"
            SELECT tenant_id, overdue_fine_percent, plan_tier, created_at, updated_at
            FROM tenant_settings
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error loading settings for {}: {}", tenant_id, e);
            AppError::Database(format!("Failed to load tenant settings: {}", e))
        })?;

        Ok(row
            .map(Into::into)
            .unwrap_or_else(|| TenantSettings::defaults(tenant_id)))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    tenant_id: Uuid,
    overdue_fine_percent: Decimal,
    plan_tier: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for TenantSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            tenant_id: row.tenant_id,
            overdue_fine_percent: row.overdue_fine_percent,
            plan_tier: PgSettingsRepository::parse_tier(&row.plan_tier),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tier() {
        assert_eq!(PgSettingsRepository::parse_tier("pro"), PlanTier::Pro);
        assert_eq!(
            PgSettingsRepository::parse_tier("starter"),
            PlanTier::Starter
        );
        // unknown tiers degrade to starter
        assert_eq!(
            PgSettingsRepository::parse_tier("enterprise"),
            PlanTier::Starter
        );
    }
}
