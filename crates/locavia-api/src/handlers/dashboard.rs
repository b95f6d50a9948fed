//! Dashboard handler
//!
//! Thin adapter over the analytics engine; every aggregate is computed
//! fresh per request.

use actix_web::{web, HttpResponse};
use locavia_core::AppError;
use locavia_services::{PgAnalyticsEngine, StatsPeriod};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::extract::TenantContext;

/// Query parameters for dashboard stats
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Reporting window (today/7d/30d)
    #[serde(default)]
    pub period: StatsPeriod,
}

/// Dashboard statistics snapshot
///
/// GET /api/v1/dashboard/stats
#[instrument(skip(engine))]
pub async fn get_dashboard_stats(
    engine: web::Data<PgAnalyticsEngine>,
    ctx: TenantContext,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    debug!(period = ?query.period, "Getting dashboard stats");

    let stats = engine.dashboard_stats(ctx.tenant_id, query.period).await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/stats", web::get().to(get_dashboard_stats)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_query_defaults_to_today() {
        let query: StatsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.period, StatsPeriod::Today);
    }

    #[test]
    fn test_stats_query_parses_period() {
        let query: StatsQuery = serde_json::from_str(r#"{"period": "30d"}"#).unwrap();
        assert_eq!(query.period, StatsPeriod::Last30Days);
    }
}
