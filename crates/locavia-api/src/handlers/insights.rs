//! Insight handlers
//!
//! ROI, customer and zombie-tool reports. ROI and customer insights are
//! plan-gated in the engine; the handlers just pass the verdict through
//! (403 with a `plan_restricted` error code for starter tenants).

use actix_web::{web, HttpResponse};
use locavia_core::AppError;
use locavia_services::PgAnalyticsEngine;
use tracing::{debug, instrument};

use crate::extract::TenantContext;

/// Per-tool return on investment ranking
///
/// GET /api/v1/insights/roi
#[instrument(skip(engine))]
pub async fn get_roi_insights(
    engine: web::Data<PgAnalyticsEngine>,
    ctx: TenantContext,
) -> Result<HttpResponse, AppError> {
    debug!("Getting ROI insights");

    let insights = engine.roi_insights(ctx.tenant_id).await?;

    Ok(HttpResponse::Ok().json(insights))
}

/// Customer risk and VIP rankings
///
/// GET /api/v1/insights/customers
#[instrument(skip(engine))]
pub async fn get_customer_insights(
    engine: web::Data<PgAnalyticsEngine>,
    ctx: TenantContext,
) -> Result<HttpResponse, AppError> {
    debug!("Getting customer insights");

    let insights = engine.customer_insights(ctx.tenant_id).await?;

    Ok(HttpResponse::Ok().json(insights))
}

/// Costly tools with no recent rental activity
///
/// GET /api/v1/insights/zombies
#[instrument(skip(engine))]
pub async fn get_zombie_tools(
    engine: web::Data<PgAnalyticsEngine>,
    ctx: TenantContext,
) -> Result<HttpResponse, AppError> {
    debug!("Scanning zombie tools");

    let zombies = engine.zombie_tools(ctx.tenant_id).await?;

    Ok(HttpResponse::Ok().json(zombies))
}

/// Configure insight routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/insights")
            .route("/roi", web::get().to(get_roi_insights))
            .route("/customers", web::get().to(get_customer_insights))
            .route("/zombies", web::get().to(get_zombie_tools)),
    );
}
