//! Tool (rentable asset) models
//!
//! A tool is a single physical unit owned by a tenant. Its status mirrors
//! the rental lifecycle: exactly one active rental exists while the status
//! is `Rented`, and none otherwise.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Tool inventory status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// On the shelf, can be checked out
    #[default]
    Available,
    /// Checked out under an active rental
    Rented,
    /// Undergoing maintenance
    Maintenance,
    /// Administratively withheld from the fleet
    Unavailable,
    /// Reported lost
    Lost,
    /// Sold off (terminal)
    Sold,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Available => write!(f, "available"),
            ToolStatus::Rented => write!(f, "rented"),
            ToolStatus::Maintenance => write!(f, "maintenance"),
            ToolStatus::Unavailable => write!(f, "unavailable"),
            ToolStatus::Lost => write!(f, "lost"),
            ToolStatus::Sold => write!(f, "sold"),
        }
    }
}

impl ToolStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "available" => Some(ToolStatus::Available),
            "rented" => Some(ToolStatus::Rented),
            "maintenance" => Some(ToolStatus::Maintenance),
            "unavailable" => Some(ToolStatus::Unavailable),
            "lost" => Some(ToolStatus::Lost),
            "sold" => Some(ToolStatus::Sold),
            _ => None,
        }
    }

    /// Check if a new rental may start from this status
    pub fn is_rentable(&self) -> bool {
        matches!(self, ToolStatus::Available)
    }

    /// Check if the status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ToolStatus::Sold)
    }

    /// Check whether a transition to `next` is legal
    ///
    /// The transition map is closed: anything not listed here is rejected.
    /// `Sold` is terminal; `Lost` can only be recovered back to the shelf.
    pub fn can_transition_to(self, next: ToolStatus) -> bool {
        use ToolStatus::*;

        matches!(
            (self, next),
            (Available, Rented | Maintenance | Unavailable | Lost | Sold)
                | (Rented, Available | Lost)
                | (Maintenance, Available | Unavailable | Sold)
                | (Unavailable, Available | Maintenance | Sold)
                | (Lost, Available)
        )
    }
}

/// Tool entity
///
/// Usage counters and maintenance intervals feed the dashboard maintenance
/// alerts; acquisition figures feed the ROI insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: Option<String>,

    /// Default daily rate offered for this tool
    pub daily_rate: Decimal,

    /// Purchase cost (zero when unknown)
    pub acquisition_cost: Decimal,

    /// Purchase date
    pub acquisition_date: Option<DateTime<Utc>>,

    /// Accumulated usage hours
    pub current_usage_hours: i32,

    /// Usage hours after which maintenance is due
    pub usage_hours_limit: Option<i32>,

    /// Calendar days between maintenance services
    pub maintenance_interval_days: Option<i32>,

    /// Number of rentals between maintenance services
    pub maintenance_interval_rentals: Option<i32>,

    /// Last completed maintenance
    pub last_maintenance_at: Option<DateTime<Utc>>,

    /// Current inventory status
    pub status: ToolStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Tool {
    /// Check if the tool can be checked out right now
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status.is_rentable()
    }

    /// Check if the usage-hours maintenance criterion is met
    pub fn usage_limit_reached(&self) -> bool {
        match self.usage_hours_limit {
            Some(limit) => limit > 0 && self.current_usage_hours >= limit,
            None => false,
        }
    }

    /// Anchor timestamp for calendar-based maintenance checks
    ///
    /// Falls back to the acquisition date for tools never serviced.
    pub fn maintenance_anchor(&self) -> Option<DateTime<Utc>> {
        self.last_maintenance_at.or(self.acquisition_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ToolStatus::Available,
            ToolStatus::Rented,
            ToolStatus::Maintenance,
            ToolStatus::Unavailable,
            ToolStatus::Lost,
            ToolStatus::Sold,
        ] {
            assert_eq!(ToolStatus::from_str(&status.to_string()), Some(status));
        }
        assert_eq!(ToolStatus::from_str("broken"), None);
    }

    #[test]
    fn test_rentable() {
        assert!(ToolStatus::Available.is_rentable());
        assert!(!ToolStatus::Rented.is_rentable());
        assert!(!ToolStatus::Maintenance.is_rentable());
        assert!(!ToolStatus::Sold.is_rentable());
    }

    #[test]
    fn test_transitions() {
        assert!(ToolStatus::Available.can_transition_to(ToolStatus::Rented));
        assert!(ToolStatus::Rented.can_transition_to(ToolStatus::Available));
        assert!(ToolStatus::Rented.can_transition_to(ToolStatus::Lost));
        assert!(ToolStatus::Lost.can_transition_to(ToolStatus::Available));

        // a rented tool cannot jump straight into maintenance
        assert!(!ToolStatus::Rented.can_transition_to(ToolStatus::Maintenance));
        // sold is terminal
        assert!(!ToolStatus::Sold.can_transition_to(ToolStatus::Available));
        assert!(ToolStatus::Sold.is_terminal());
        // self-transitions are not transitions
        assert!(!ToolStatus::Available.can_transition_to(ToolStatus::Available));
    }

    #[test]
    fn test_usage_limit() {
        let now = Utc::now();
        let mut tool = Tool {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Makita drill".to_string(),
            description: None,
            daily_rate: Decimal::from(50),
            acquisition_cost: Decimal::from(500),
            acquisition_date: Some(now),
            current_usage_hours: 120,
            usage_hours_limit: Some(100),
            maintenance_interval_days: None,
            maintenance_interval_rentals: None,
            last_maintenance_at: None,
            status: ToolStatus::Available,
            created_at: now,
            updated_at: now,
        };

        assert!(tool.usage_limit_reached());
        assert_eq!(tool.maintenance_anchor(), Some(now));

        tool.usage_hours_limit = None;
        assert!(!tool.usage_limit_reached());
    }
}
