//! Analytics engine
//!
//! Read-only aggregation over tools, rentals, payments and the bookkeeping
//! ledgers. Aggregation and filtering run in SQL (grouped queries with
//! FILTER clauses); ranking and score derivation happen here. Every call
//! recomputes from scratch: no caching, no background jobs.
//!
//! ROI and customer insights are gated behind the tenant's plan tier;
//! dashboard stats and the zombie scan are available on every tier.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use locavia_core::{
    config::RentalConfig, traits::SettingsRepository, AppError, AppResult,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Reporting window for period-scoped metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatsPeriod {
    /// Since midnight UTC
    #[default]
    #[serde(rename = "today")]
    Today,
    /// Trailing seven days
    #[serde(rename = "7d")]
    Last7Days,
    /// Trailing thirty days
    #[serde(rename = "30d")]
    Last30Days,
}

impl StatsPeriod {
    /// Start of the reporting window relative to `now`
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            StatsPeriod::Today => start_of_day(now),
            StatsPeriod::Last7Days => now - Duration::days(7),
            StatsPeriod::Last30Days => now - Duration::days(30),
        }
    }
}

/// Midnight UTC of the day containing `ts`
pub fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Dashboard statistics snapshot
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    /// Reporting window used for period_revenue
    pub period: StatsPeriod,
    /// Total tools in the fleet
    pub total_tools: i64,
    /// Tools currently out under an active rental
    pub rented_tools: i64,
    /// rented_tools / total_tools x 100
    pub occupancy_rate: f64,
    /// Tools with no rental start in the trailing idle window
    pub idle_tools: i64,
    /// idle_tools / total_tools x 100
    pub idle_rate: f64,
    /// Open rental contracts
    pub active_rentals: i64,
    /// Active rentals due back today
    pub returns_due_today: i64,
    /// Active rentals overdue past the critical threshold
    pub critical_overdue: i64,
    /// Tools meeting at least one maintenance criterion
    pub maintenance_alerts: Vec<MaintenanceAlert>,
    /// Sum of all completed payments
    pub actual_revenue: f64,
    /// Completed payments settled inside the reporting window
    pub period_revenue: f64,
    /// Sum of all pending payments
    pub to_receive: f64,
    /// Sum of the expenses ledger
    pub total_expenses: f64,
    /// Sum of the other-revenues ledger, reported separately
    pub other_revenue: f64,
    /// actual_revenue - total_expenses
    pub net_profit: f64,
}

/// A tool due for maintenance, with the criteria it met
#[derive(Debug, Serialize)]
pub struct MaintenanceAlert {
    pub tool_id: Uuid,
    pub tool_name: String,
    pub reasons: Vec<String>,
}

/// Return on investment of a single tool
#[derive(Debug, Serialize)]
pub struct ToolRoi {
    pub tool_id: Uuid,
    pub tool_name: String,
    pub acquisition_cost: f64,
    /// Completed payments collected through this tool's rentals
    pub revenue: f64,
    pub maintenance_cost: f64,
    /// revenue - maintenance_cost
    pub profit: f64,
    /// profit / acquisition_cost x 100
    pub roi_percent: f64,
}

/// Risk and VIP rankings over a tenant's customers
#[derive(Debug, Serialize)]
pub struct CustomerInsights {
    /// Highest risk scores first
    pub risk_ranking: Vec<CustomerRisk>,
    /// Highest collected revenue first
    pub vip_ranking: Vec<CustomerVip>,
}

/// Late-return risk profile of one customer
#[derive(Debug, Serialize)]
pub struct CustomerRisk {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub total_rentals: i64,
    pub late_rentals: i64,
    /// late_rentals / total_rentals
    pub late_ratio: f64,
    /// Mean overdue days among late returns
    pub avg_delay_days: f64,
    /// min(100, late_ratio x 70 + min(30, avg_delay x 3))
    pub risk_score: f64,
}

/// Revenue profile of one customer
#[derive(Debug, Serialize)]
pub struct CustomerVip {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub total_rentals: i64,
    pub total_revenue: f64,
}

/// A costly tool that generated no rental activity lately
#[derive(Debug, Serialize)]
pub struct ZombieTool {
    pub tool_id: Uuid,
    pub tool_name: String,
    pub acquisition_cost: f64,
    /// Days since the last rental start (or since acquisition)
    pub idle_days: i64,
    pub last_rental_start: Option<DateTime<Utc>>,
}

/// Analytics engine
pub struct AnalyticsEngine<S: SettingsRepository> {
    settings_repo: Arc<S>,
    pool: Arc<PgPool>,
    config: RentalConfig,
}

impl<S: SettingsRepository> AnalyticsEngine<S> {
    /// Create a new analytics engine
    pub fn new(settings_repo: Arc<S>, pool: Arc<PgPool>, config: RentalConfig) -> Self {
        Self {
            settings_repo,
            pool,
            config,
        }
    }

    /// Compute the dashboard snapshot for a tenant
    #[instrument(skip(self))]
    pub async fn dashboard_stats(
        &self,
        tenant_id: Uuid,
        period: StatsPeriod,
    ) -> AppResult<DashboardStats> {
        debug!("Computing dashboard stats for tenant {}", tenant_id);

        let now = Utc::now();
        let today_start = start_of_day(now);
        let tomorrow_start = today_start + Duration::days(1);
        let critical_cutoff = now - Duration::days(self.config.critical_overdue_days);
        let idle_cutoff = now - Duration::days(self.config.idle_window_days);
        let period_start = period.window_start(now);

        let (total_tools, rented_tools): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'rented')
            FROM tools
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error computing fleet stats: {}", e);
            AppError::Database(format!("Failed to compute fleet stats: {}", e))
        })?;

        let (idle_tools,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tools t
            WHERE t.tenant_id = $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM rentals r
                  WHERE r.tenant_id = t.tenant_id
                    AND r.tool_id = t.id
                    AND r.status <> 'cancelled'
                    AND r.start_date >= $2
              )
            "#,
        )
        .bind(tenant_id)
        .bind(idle_cutoff)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error computing idle stats: {}", e);
            AppError::Database(format!("Failed to compute idle stats: {}", e))
        })?;

        let (active_rentals, returns_due_today, critical_overdue): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*) FILTER (WHERE status = 'active'),
                       COUNT(*) FILTER (
                           WHERE status = 'active'
                             AND end_date_expected >= $2
                             AND end_date_expected < $3
                       ),
                       COUNT(*) FILTER (
                           WHERE status = 'active' AND end_date_expected < $4
                       )
                FROM rentals
                WHERE tenant_id = $1
                "#,
            )
            .bind(tenant_id)
            .bind(today_start)
            .bind(tomorrow_start)
            .bind(critical_cutoff)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                error!("Database error computing rental stats: {}", e);
                AppError::Database(format!("Failed to compute rental stats: {}", e))
            })?;

        let (actual_revenue, period_revenue, to_receive): (Decimal, Decimal, Decimal) =
            sqlx::query_as(
                r#"
                SELECT COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0),
                       COALESCE(SUM(amount) FILTER (
                           WHERE status = 'completed' AND payment_date >= $2
                       ), 0),
                       COALESCE(SUM(amount) FILTER (WHERE status = 'pending'), 0)
                FROM payments
                WHERE tenant_id = $1
                "#,
            )
            .bind(tenant_id)
            .bind(period_start)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                error!("Database error computing revenue stats: {}", e);
                AppError::Database(format!("Failed to compute revenue stats: {}", e))
            })?;

        let (total_expenses,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error summing expenses: {}", e);
            AppError::Database(format!("Failed to sum expenses: {}", e))
        })?;

        let (other_revenue,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM other_revenues WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error summing other revenues: {}", e);
            AppError::Database(format!("Failed to sum other revenues: {}", e))
        })?;

        let maintenance_alerts = self.maintenance_alerts(tenant_id, now).await?;

        Ok(DashboardStats {
            period,
            total_tools,
            rented_tools,
            occupancy_rate: percentage(rented_tools, total_tools),
            idle_tools,
            idle_rate: percentage(idle_tools, total_tools),
            active_rentals,
            returns_due_today,
            critical_overdue,
            maintenance_alerts,
            actual_revenue: money(actual_revenue),
            period_revenue: money(period_revenue),
            to_receive: money(to_receive),
            total_expenses: money(total_expenses),
            other_revenue: money(other_revenue),
            net_profit: money(actual_revenue - total_expenses),
        })
    }

    /// Tools meeting at least one maintenance criterion
    async fn maintenance_alerts(
        &self,
        tenant_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceAlert>> {
        let rows = sqlx::query_as::<sqlx::Postgres, MaintenanceRow>(
            r#"
            SELECT t.id, t.name, t.current_usage_hours, t.usage_hours_limit,
                   t.maintenance_interval_days, t.maintenance_interval_rentals,
                   t.last_maintenance_at, t.acquisition_date,
                   (
                       SELECT COUNT(*)
                       FROM rentals r
                       WHERE r.tenant_id = t.tenant_id
                         AND r.tool_id = t.id
                         AND r.status <> 'cancelled'
                         AND r.start_date >= COALESCE(
                             t.last_maintenance_at,
                             t.acquisition_date,
                             '-infinity'::timestamptz
                         )
                   ) AS rentals_since_maintenance
            FROM tools t
            WHERE t.tenant_id = $1
              AND t.status <> 'sold'
              AND (t.usage_hours_limit IS NOT NULL
                   OR t.maintenance_interval_days IS NOT NULL
                   OR t.maintenance_interval_rentals IS NOT NULL)
            "#,
        )
        .bind(tenant_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error scanning maintenance criteria: {}", e);
            AppError::Database(format!("Failed to scan maintenance criteria: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let reasons = maintenance_reasons(&row, now);
                if reasons.is_empty() {
                    None
                } else {
                    Some(MaintenanceAlert {
                        tool_id: row.id,
                        tool_name: row.name,
                        reasons,
                    })
                }
            })
            .collect())
    }

    /// Per-tool return on investment, best first
    ///
    /// Pro tier only. Tools without a recorded acquisition cost are
    /// excluded; the ranking keeps the configured top entries.
    #[instrument(skip(self))]
    pub async fn roi_insights(&self, tenant_id: Uuid) -> AppResult<Vec<ToolRoi>> {
        let settings = self.settings_repo.get(tenant_id).await?;
        if !settings.plan_tier.allows_insights() {
            return Err(AppError::PlanRestricted("roi insights".to_string()));
        }

        debug!("Computing ROI insights for tenant {}", tenant_id);

        let rows = sqlx::query_as::<sqlx::Postgres, RoiRow>(
            r#"
            SELECT t.id, t.name, t.acquisition_cost,
                   COALESCE(rev.revenue, 0) AS revenue,
                   COALESCE(m.cost, 0) AS maintenance_cost
            FROM tools t
            LEFT JOIN (
                SELECT r.tool_id, SUM(p.amount) AS revenue
                FROM payments p
                JOIN rentals r ON r.id = p.rental_id
                WHERE p.tenant_id = $1 AND p.status = 'completed'
                GROUP BY r.tool_id
            ) rev ON rev.tool_id = t.id
            LEFT JOIN (
                SELECT tool_id, SUM(cost) AS cost
                FROM maintenance_logs
                WHERE tenant_id = $1
                GROUP BY tool_id
            ) m ON m.tool_id = t.id
            WHERE t.tenant_id = $1 AND t.acquisition_cost > 0
            "#,
        )
        .bind(tenant_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error computing ROI: {}", e);
            AppError::Database(format!("Failed to compute ROI: {}", e))
        })?;

        let mut insights: Vec<ToolRoi> = rows
            .into_iter()
            .map(|row| {
                let profit = row.revenue - row.maintenance_cost;
                ToolRoi {
                    tool_id: row.id,
                    tool_name: row.name,
                    acquisition_cost: money(row.acquisition_cost),
                    revenue: money(row.revenue),
                    maintenance_cost: money(row.maintenance_cost),
                    profit: money(profit),
                    roi_percent: roi_percent(profit, row.acquisition_cost),
                }
            })
            .collect();

        insights.sort_by(|a, b| {
            b.roi_percent
                .partial_cmp(&a.roi_percent)
                .unwrap_or(Ordering::Equal)
        });
        insights.truncate(self.config.ranking_size);

        Ok(insights)
    }

    /// Customer risk and VIP rankings
    ///
    /// Pro tier only. Cancelled rentals are ignored; customers enter the
    /// risk ranking only once they have a late return, and the VIP ranking
    /// only once they have collected revenue.
    #[instrument(skip(self))]
    pub async fn customer_insights(&self, tenant_id: Uuid) -> AppResult<CustomerInsights> {
        let settings = self.settings_repo.get(tenant_id).await?;
        if !settings.plan_tier.allows_insights() {
            return Err(AppError::PlanRestricted("customer insights".to_string()));
        }

        debug!("Computing customer insights for tenant {}", tenant_id);

        let rows = sqlx::query_as::<sqlx::Postgres, CustomerStatRow>(
            r#"
            SELECT c.id, c.name,
                   COUNT(r.id) AS total_rentals,
                   COUNT(r.id) FILTER (
                       WHERE r.status = 'returned'
                         AND r.end_date_actual > r.end_date_expected
                   ) AS late_rentals,
                   COALESCE(AVG(
                       CEIL(EXTRACT(EPOCH FROM (r.end_date_actual - r.end_date_expected)) / 86400.0)
                   ) FILTER (
                       WHERE r.status = 'returned'
                         AND r.end_date_actual > r.end_date_expected
                   ), 0)::float8 AS avg_delay_days,
                   COALESCE(rev.revenue, 0) AS total_revenue
            FROM customers c
            JOIN rentals r
                ON r.tenant_id = c.tenant_id
               AND r.customer_id = c.id
               AND r.status <> 'cancelled'
            LEFT JOIN (
                SELECT r2.customer_id, SUM(p.amount) AS revenue
                FROM payments p
                JOIN rentals r2 ON r2.id = p.rental_id
                WHERE p.tenant_id = $1 AND p.status = 'completed'
                GROUP BY r2.customer_id
            ) rev ON rev.customer_id = c.id
            WHERE c.tenant_id = $1
            GROUP BY c.id, c.name, rev.revenue
            "#,
        )
        .bind(tenant_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error computing customer insights: {}", e);
            AppError::Database(format!("Failed to compute customer insights: {}", e))
        })?;

        let mut risk_ranking: Vec<CustomerRisk> = rows
            .iter()
            .filter(|row| row.late_rentals > 0)
            .map(|row| {
                let late_ratio = row.late_rentals as f64 / row.total_rentals as f64;
                CustomerRisk {
                    customer_id: row.id,
                    customer_name: row.name.clone(),
                    total_rentals: row.total_rentals,
                    late_rentals: row.late_rentals,
                    late_ratio,
                    avg_delay_days: row.avg_delay_days,
                    risk_score: risk_score(late_ratio, row.avg_delay_days),
                }
            })
            .collect();

        risk_ranking.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(Ordering::Equal)
        });
        risk_ranking.truncate(self.config.ranking_size);

        let mut vip_ranking: Vec<CustomerVip> = rows
            .iter()
            .filter(|row| row.total_revenue > Decimal::ZERO)
            .map(|row| CustomerVip {
                customer_id: row.id,
                customer_name: row.name.clone(),
                total_rentals: row.total_rentals,
                total_revenue: money(row.total_revenue),
            })
            .collect();

        vip_ranking.sort_by(|a, b| {
            b.total_revenue
                .partial_cmp(&a.total_revenue)
                .unwrap_or(Ordering::Equal)
        });
        vip_ranking.truncate(self.config.ranking_size);

        Ok(CustomerInsights {
            risk_ranking,
            vip_ranking,
        })
    }

    /// Costly tools with no recent rental activity, most idle first
    #[instrument(skip(self))]
    pub async fn zombie_tools(&self, tenant_id: Uuid) -> AppResult<Vec<ZombieTool>> {
        debug!("Scanning zombie tools for tenant {}", tenant_id);

        let now = Utc::now();
        let idle_cutoff = now - Duration::days(self.config.idle_window_days);

        let rows = sqlx::query_as::<sqlx::Postgres, ZombieRow>(
            r#"
            SELECT t.id, t.name, t.acquisition_cost, t.acquisition_date, t.created_at,
                   MAX(r.start_date) AS last_rental_start
            FROM tools t
            LEFT JOIN rentals r
                ON r.tenant_id = t.tenant_id
               AND r.tool_id = t.id
               AND r.status <> 'cancelled'
            WHERE t.tenant_id = $1 AND t.acquisition_cost > 0
            GROUP BY t.id, t.name, t.acquisition_cost, t.acquisition_date, t.created_at
            HAVING MAX(r.start_date) IS NULL OR MAX(r.start_date) < $2
            "#,
        )
        .bind(tenant_id)
        .bind(idle_cutoff)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Database error scanning zombie tools: {}", e);
            AppError::Database(format!("Failed to scan zombie tools: {}", e))
        })?;

        let mut zombies: Vec<ZombieTool> = rows
            .into_iter()
            .map(|row| {
                let anchor = row
                    .last_rental_start
                    .or(row.acquisition_date)
                    .unwrap_or(row.created_at);

                ZombieTool {
                    tool_id: row.id,
                    tool_name: row.name,
                    acquisition_cost: money(row.acquisition_cost),
                    idle_days: (now - anchor).num_days().max(0),
                    last_rental_start: row.last_rental_start,
                }
            })
            .collect();

        zombies.sort_by(|a, b| b.idle_days.cmp(&a.idle_days));

        Ok(zombies)
    }
}

/// part / total x 100, zero when the denominator is zero
fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Lossy conversion for reporting values
fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// min(100, late_ratio x 70 + min(30, avg_delay x 3))
fn risk_score(late_ratio: f64, avg_delay_days: f64) -> f64 {
    (late_ratio * 70.0 + (avg_delay_days * 3.0).min(30.0)).min(100.0)
}

/// profit / acquisition_cost x 100, zero when the cost is unknown
fn roi_percent(profit: Decimal, acquisition_cost: Decimal) -> f64 {
    if acquisition_cost <= Decimal::ZERO {
        return 0.0;
    }
    money(profit / acquisition_cost * Decimal::ONE_HUNDRED)
}

/// Derive the maintenance criteria a tool currently meets
fn maintenance_reasons(row: &MaintenanceRow, now: DateTime<Utc>) -> Vec<String> {
    let mut reasons = Vec::new();

    if let Some(limit) = row.usage_hours_limit {
        if limit > 0 && row.current_usage_hours >= limit {
            reasons.push(format!("usage hours {}/{}", row.current_usage_hours, limit));
        }
    }

    if let Some(interval) = row.maintenance_interval_days {
        let anchor = row.last_maintenance_at.or(row.acquisition_date);
        if let Some(anchor) = anchor {
            let elapsed = (now - anchor).num_days();
            if interval > 0 && elapsed >= i64::from(interval) {
                reasons.push(format!("last maintenance {} days ago", elapsed));
            }
        }
    }

    if let Some(interval) = row.maintenance_interval_rentals {
        if interval > 0 && row.rentals_since_maintenance >= i64::from(interval) {
            reasons.push(format!(
                "{} rentals since last maintenance",
                row.rentals_since_maintenance
            ));
        }
    }

    reasons
}

/// Helper struct for maintenance criteria rows
#[derive(Debug, sqlx::FromRow)]
struct MaintenanceRow {
    id: Uuid,
    name: String,
    current_usage_hours: i32,
    usage_hours_limit: Option<i32>,
    maintenance_interval_days: Option<i32>,
    maintenance_interval_rentals: Option<i32>,
    last_maintenance_at: Option<DateTime<Utc>>,
    acquisition_date: Option<DateTime<Utc>>,
    rentals_since_maintenance: i64,
}

/// Helper struct for ROI rows
#[derive(Debug, sqlx::FromRow)]
struct RoiRow {
    id: Uuid,
    name: String,
    acquisition_cost: Decimal,
    revenue: Decimal,
    maintenance_cost: Decimal,
}

/// Helper struct for customer stat rows
#[derive(Debug, sqlx::FromRow)]
struct CustomerStatRow {
    id: Uuid,
    name: String,
    total_rentals: i64,
    late_rentals: i64,
    avg_delay_days: f64,
    total_revenue: Decimal,
}

/// Helper struct for zombie scan rows
#[derive(Debug, sqlx::FromRow)]
struct ZombieRow {
    id: Uuid,
    name: String,
    acquisition_cost: Decimal,
    acquisition_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    last_rental_start: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3, 10), 30.0);
        assert_eq!(percentage(0, 10), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(10, 10), 100.0);
    }

    #[test]
    fn test_risk_score_formula() {
        // half the rentals late, two days average delay
        assert_eq!(risk_score(0.5, 2.0), 35.0 + 6.0);

        // delay contribution caps at 30
        assert_eq!(risk_score(0.0, 100.0), 30.0);

        // total caps at 100
        assert_eq!(risk_score(1.0, 50.0), 100.0);

        // clean customer
        assert_eq!(risk_score(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_roi_percent_formula() {
        assert_eq!(roi_percent(dec!(500), dec!(1000)), 50.0);
        assert_eq!(roi_percent(dec!(-200), dec!(1000)), -20.0);
        assert_eq!(roi_percent(dec!(500), Decimal::ZERO), 0.0);
    }

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();

        assert_eq!(
            StatsPeriod::Today.window_start(now),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            StatsPeriod::Last7Days.window_start(now),
            Utc.with_ymd_and_hms(2024, 3, 8, 14, 30, 0).unwrap()
        );
        assert_eq!(
            StatsPeriod::Last30Days.window_start(now),
            Utc.with_ymd_and_hms(2024, 2, 14, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_period_serde_names() {
        assert_eq!(
            serde_json::to_string(&StatsPeriod::Today).unwrap(),
            "\"today\""
        );
        assert_eq!(
            serde_json::to_string(&StatsPeriod::Last7Days).unwrap(),
            "\"7d\""
        );
        let parsed: StatsPeriod = serde_json::from_str("\"30d\"").unwrap();
        assert_eq!(parsed, StatsPeriod::Last30Days);
    }

    fn candidate(now: DateTime<Utc>) -> MaintenanceRow {
        MaintenanceRow {
            id: Uuid::new_v4(),
            name: "Bosch hammer".to_string(),
            current_usage_hours: 50,
            usage_hours_limit: Some(100),
            maintenance_interval_days: Some(90),
            maintenance_interval_rentals: Some(20),
            last_maintenance_at: Some(now - Duration::days(10)),
            acquisition_date: Some(now - Duration::days(400)),
            rentals_since_maintenance: 3,
        }
    }

    #[test]
    fn test_maintenance_reasons_clean_tool() {
        let now = Utc::now();
        assert!(maintenance_reasons(&candidate(now), now).is_empty());
    }

    #[test]
    fn test_maintenance_reasons_usage_limit() {
        let now = Utc::now();
        let mut row = candidate(now);
        row.current_usage_hours = 120;

        let reasons = maintenance_reasons(&row, now);
        assert_eq!(reasons, vec!["usage hours 120/100".to_string()]);
    }

    #[test]
    fn test_maintenance_reasons_calendar_interval() {
        let now = Utc::now();
        let mut row = candidate(now);
        row.last_maintenance_at = Some(now - Duration::days(120));

        let reasons = maintenance_reasons(&row, now);
        assert_eq!(reasons, vec!["last maintenance 120 days ago".to_string()]);
    }

    #[test]
    fn test_maintenance_reasons_fall_back_to_acquisition() {
        let now = Utc::now();
        let mut row = candidate(now);
        row.last_maintenance_at = None;

        // anchor falls back to the 400-day-old acquisition date
        let reasons = maintenance_reasons(&row, now);
        assert_eq!(reasons, vec!["last maintenance 400 days ago".to_string()]);
    }

    #[test]
    fn test_maintenance_reasons_rental_interval() {
        let now = Utc::now();
        let mut row = candidate(now);
        row.rentals_since_maintenance = 25;

        let reasons = maintenance_reasons(&row, now);
        assert_eq!(
            reasons,
            vec!["25 rentals since last maintenance".to_string()]
        );
    }

    #[test]
    fn test_maintenance_reasons_stack() {
        let now = Utc::now();
        let mut row = candidate(now);
        row.current_usage_hours = 150;
        row.rentals_since_maintenance = 30;

        assert_eq!(maintenance_reasons(&row, now).len(), 2);
    }

    #[test]
    fn test_dashboard_stats_serialization() {
        let stats = DashboardStats {
            period: StatsPeriod::Today,
            total_tools: 12,
            rented_tools: 4,
            occupancy_rate: percentage(4, 12),
            idle_tools: 2,
            idle_rate: percentage(2, 12),
            active_rentals: 4,
            returns_due_today: 1,
            critical_overdue: 0,
            maintenance_alerts: vec![],
            actual_revenue: 1250.0,
            period_revenue: 200.0,
            to_receive: 430.0,
            total_expenses: 300.0,
            other_revenue: 50.0,
            net_profit: 950.0,
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"period\":\"today\""));
        assert!(json.contains("\"total_tools\":12"));
        assert!(json.contains("\"net_profit\":950.0"));
    }
}
