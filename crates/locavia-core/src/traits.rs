//! Common traits for repositories
//!
//! Defines abstractions for database access. Every method takes the owning
//! `tenant_id` explicitly; a lookup without a tenant does not exist in this
//! domain, so no tenant-free accessor is offered.

use crate::error::AppError;
use crate::models::{Payment, Rental, RentalStatus, TenantSettings, Tool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Tool repository trait
///
/// The rental engine performs its own locked reads inside transactions;
/// this trait covers the plain read paths used by HTTP handlers.
#[async_trait]
pub trait ToolRepository: Send + Sync {
    /// Find a tool within a tenant
    async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Tool>, AppError>;
}

/// Filters for rental listing
#[derive(Debug, Clone, Default)]
pub struct RentalFilter {
    /// Filter by contract status
    pub status: Option<RentalStatus>,

    /// Filter by tool
    pub tool_id: Option<Uuid>,

    /// Filter by customer
    pub customer_id: Option<Uuid>,

    /// Keep only active rentals past their agreed return date
    pub overdue_only: bool,
}

/// Rental repository trait
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Find a rental within a tenant
    async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Rental>, AppError>;

    /// List rentals with filtering and pagination
    async fn list(
        &self,
        tenant_id: Uuid,
        filter: &RentalFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Rental>, i64), AppError>;

    /// Rental history of a tool, cancelled contracts excluded
    async fn find_for_tool(&self, tenant_id: Uuid, tool_id: Uuid) -> Result<Vec<Rental>, AppError>;

    /// Active rentals whose agreed return date falls inside a window
    async fn find_expiring(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Rental>, AppError>;
}

/// Payment repository trait
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Payment ledger of a rental, oldest first
    async fn find_for_rental(
        &self,
        tenant_id: Uuid,
        rental_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>;
}

/// Tenant settings repository trait
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Settings for a tenant, falling back to defaults when no row exists
    async fn get(&self, tenant_id: Uuid) -> Result<TenantSettings, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(3, 20);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(0, 10); // page 0 becomes 1
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 2000); // per_page capped at 1000
        assert_eq!(p.per_page, 1000);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(95, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(101, 1, 10);
        assert_eq!(meta.total_pages, 11);
    }

    #[test]
    fn test_default_filter_is_open() {
        let filter = RentalFilter::default();
        assert!(filter.status.is_none());
        assert!(!filter.overdue_only);
    }
}
