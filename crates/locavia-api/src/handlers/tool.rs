//! Tool availability handler
//!
//! Read-only calendar feed for a single tool. Tool CRUD lives in the
//! platform layer; the engine only answers "can this go out, and when
//! was it out before".

use actix_web::{web, HttpResponse};
use locavia_core::traits::{RentalRepository, ToolRepository};
use locavia_core::AppError;
use locavia_db::{PgRentalRepository, PgToolRepository};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::dto::{ApiResponse, RentalResponse};
use crate::extract::TenantContext;

/// Availability feed for one tool
#[derive(Debug, Serialize)]
pub struct ToolAvailabilityResponse {
    /// Tool ID
    pub tool_id: Uuid,

    /// Tool name
    pub tool_name: String,

    /// Current inventory status
    pub status: String,

    /// Whether a checkout would be accepted right now
    pub is_rentable: bool,

    /// Rental history, cancelled contracts excluded, newest start first
    pub rentals: Vec<RentalResponse>,
}

/// Availability and rental history of a tool
///
/// GET /api/v1/tools/{id}/availability
#[instrument(skip(pool))]
pub async fn get_tool_availability(
    pool: web::Data<PgPool>,
    ctx: TenantContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let tool_id = path.into_inner();
    debug!(%tool_id, "Getting tool availability");

    let tool = PgToolRepository::new(pool.get_ref().clone())
        .find(ctx.tenant_id, tool_id)
        .await?
        .ok_or_else(|| AppError::ToolNotFound(tool_id.to_string()))?;

    let rentals = PgRentalRepository::new(pool.get_ref().clone())
        .find_for_tool(ctx.tenant_id, tool_id)
        .await?;

    let response = ToolAvailabilityResponse {
        tool_id: tool.id,
        tool_name: tool.name,
        status: tool.status.to_string(),
        is_rentable: tool.status.is_rentable(),
        rentals: rentals.into_iter().map(Into::into).collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure tool routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tools").route("/{id}/availability", web::get().to(get_tool_availability)),
    );
}
