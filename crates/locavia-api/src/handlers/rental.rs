//! Rental lifecycle handlers
//!
//! HTTP handlers for checkout, check-in, cancellation and rental queries.

use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use locavia_core::models::RentalStatus;
use locavia_core::traits::{RentalFilter, RentalRepository};
use locavia_core::{AppConfig, AppError};
use locavia_db::PgRentalRepository;
use locavia_services::analytics::start_of_day;
use locavia_services::PgRentalManager;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    ApiResponse, CheckinRentalRequest, CreateRentalRequest, PaginationParams, RentalFilterParams,
    RentalResponse,
};
use crate::extract::TenantContext;

/// Open a new rental contract
///
/// POST /api/v1/rentals
#[instrument(skip(manager, req))]
pub async fn create_rental(
    manager: web::Data<PgRentalManager>,
    ctx: TenantContext,
    req: web::Json<CreateRentalRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Checkout validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let actor = ctx.actor()?;
    debug!(tool_id = %req.tool_id, customer_id = %req.customer_id, "Creating rental");

    let rental = manager
        .checkout(ctx.tenant_id, actor, req.to_command())
        .await?;

    info!(
        rental_code = %rental.rental_code,
        "Rental created successfully"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        RentalResponse::from(rental),
        "Rental created successfully",
    )))
}

/// List rentals with pagination and filters
///
/// GET /api/v1/rentals
#[instrument(skip(pool))]
pub async fn list_rentals(
    pool: web::Data<PgPool>,
    ctx: TenantContext,
    query: web::Query<PaginationParams>,
    filters: web::Query<RentalFilterParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        "Listing rentals"
    );

    let filter = to_filter(&filters)?;
    let repo = PgRentalRepository::new(pool.get_ref().clone());

    let (rentals, total) = repo
        .list(ctx.tenant_id, &filter, query.limit(), query.offset())
        .await?;

    let response_data: Vec<RentalResponse> = rentals.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Active rentals due back within the reminder window
///
/// GET /api/v1/rentals/expiring
#[instrument(skip(pool, config))]
pub async fn list_expiring_rentals(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    ctx: TenantContext,
) -> Result<HttpResponse, AppError> {
    let from = start_of_day(Utc::now());
    let to = from + Duration::days(config.rental.expiring_window_days);

    debug!(%from, %to, "Listing expiring rentals");

    let repo = PgRentalRepository::new(pool.get_ref().clone());
    let rentals = repo.find_expiring(ctx.tenant_id, from, to).await?;

    let response_data: Vec<RentalResponse> = rentals.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Get a single rental by ID
///
/// GET /api/v1/rentals/{id}
#[instrument(skip(pool))]
pub async fn get_rental(
    pool: web::Data<PgPool>,
    ctx: TenantContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let rental_id = path.into_inner();
    debug!(%rental_id, "Getting rental");

    let repo = PgRentalRepository::new(pool.get_ref().clone());
    let rental = repo
        .find(ctx.tenant_id, rental_id)
        .await?
        .ok_or_else(|| AppError::RentalNotFound(rental_id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(RentalResponse::from(rental))))
}

/// Check a rental back in
///
/// POST /api/v1/rentals/{id}/checkin
#[instrument(skip(manager, req))]
pub async fn checkin_rental(
    manager: web::Data<PgRentalManager>,
    ctx: TenantContext,
    path: web::Path<Uuid>,
    req: web::Json<CheckinRentalRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Check-in validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let actor = ctx.actor()?;
    let rental_id = path.into_inner();
    debug!(%rental_id, "Checking in rental");

    let rental = manager
        .check_in(ctx.tenant_id, rental_id, actor, req.to_command())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        RentalResponse::from(rental),
        "Rental checked in successfully",
    )))
}

/// Cancel a rental contract
///
/// POST /api/v1/rentals/{id}/cancel
#[instrument(skip(manager))]
pub async fn cancel_rental(
    manager: web::Data<PgRentalManager>,
    ctx: TenantContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let rental_id = path.into_inner();
    debug!(%rental_id, "Cancelling rental");

    let rental = manager.cancel(ctx.tenant_id, rental_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        RentalResponse::from(rental),
        "Rental cancelled successfully",
    )))
}

/// Translate query filters into a repository filter
fn to_filter(params: &RentalFilterParams) -> Result<RentalFilter, AppError> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            RentalStatus::from_str(s)
                .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", s)))?,
        ),
        None => None,
    };

    Ok(RentalFilter {
        status,
        tool_id: params.tool_id,
        customer_id: params.customer_id,
        overdue_only: params.overdue,
    })
}

/// Configure rental routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rentals")
            .route("", web::post().to(create_rental))
            .route("", web::get().to(list_rentals))
            // Registered before /{id} so the literal segment wins
            .route("/expiring", web::get().to(list_expiring_rentals))
            .route("/{id}", web::get().to(get_rental))
            .route("/{id}/checkin", web::post().to(checkin_rental))
            .route("/{id}/cancel", web::post().to(cancel_rental)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_translation() {
        let params = RentalFilterParams {
            status: Some("active".to_string()),
            tool_id: None,
            customer_id: None,
            overdue: true,
        };

        let filter = to_filter(&params).unwrap();
        assert_eq!(filter.status, Some(RentalStatus::Active));
        assert!(filter.overdue_only);
    }

    #[test]
    fn test_filter_rejects_unknown_status() {
        let params = RentalFilterParams {
            status: Some("lost".to_string()),
            ..Default::default()
        };

        assert!(to_filter(&params).is_err());
    }

    #[test]
    fn test_empty_filter_translates_to_default() {
        let filter = to_filter(&RentalFilterParams::default()).unwrap();
        assert!(filter.status.is_none());
        assert!(filter.tool_id.is_none());
        assert!(!filter.overdue_only);
    }
}
