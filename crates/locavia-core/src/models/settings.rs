//! Per-tenant settings

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Subscription tier of a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Entry tier: lifecycle, billing and dashboard stats
    #[default]
    Starter,
    /// Full tier: adds ROI and customer insights
    Pro,
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Starter => write!(f, "starter"),
            PlanTier::Pro => write!(f, "pro"),
        }
    }
}

impl PlanTier {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "starter" => Some(PlanTier::Starter),
            "pro" => Some(PlanTier::Pro),
            _ => None,
        }
    }

    /// Check if the tier unlocks advanced analytics
    pub fn allows_insights(&self) -> bool {
        matches!(self, PlanTier::Pro)
    }
}

/// Tenant-level configuration stored in the database
///
/// Tenants without a row get [`TenantSettings::defaults`]; the engine never
/// fails a billing operation because settings are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSettings {
    /// Owning tenant
    pub tenant_id: Uuid,

    /// Fine percent applied per overdue day
    pub overdue_fine_percent: Decimal,

    /// Subscription tier
    pub plan_tier: PlanTier,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl TenantSettings {
    /// Default settings for a tenant without a stored row
    pub fn defaults(tenant_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            tenant_id,
            overdue_fine_percent: Decimal::from(10),
            plan_tier: PlanTier::Starter,
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
    fn test_defaults() {
        let settings = TenantSettings::defaults(Uuid::new_v4());
        assert_eq!(settings.overdue_fine_percent, dec!(10));
        assert_eq!(settings.plan_tier, PlanTier::Starter);
        assert!(!settings.plan_tier.allows_insights());
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!(PlanTier::from_str("pro"), Some(PlanTier::Pro));
        assert_eq!(PlanTier::from_str("STARTER"), Some(PlanTier::Starter));
        assert_eq!(PlanTier::from_str("enterprise"), None);
        assert!(PlanTier::Pro.allows_insights());
    }
}
