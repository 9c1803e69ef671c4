use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use sqlx::PgPool;
use time::{Date, Duration, OffsetDateTime};
use tracing::instrument;

use crate::state::AppState;

use super::dto::{fill_trends, profit_percentage, AnalyticsStats, DashboardStats};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/analytics", get(analytics_stats))
}

#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let first_of_month = today.replace_day(1).map_err(internal)?;

    let (total_revenue, monthly_revenue): (f64, f64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_cost), 0),
               COALESCE(SUM(CASE WHEN log_date >= $1 THEN total_cost ELSE 0 END), 0)
        FROM daily_logs
        "#,
    )
    .bind(first_of_month)
    .fetch_one(&state.db)
    .await
    .map_err(internal)?;

    let (total_expenses, monthly_expenses): (f64, f64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(amount), 0),
               COALESCE(SUM(CASE WHEN expense_date >= $1 THEN amount ELSE 0 END), 0)
        FROM expenses
        "#,
    )
    .bind(first_of_month)
    .fetch_one(&state.db)
    .await
    .map_err(internal)?;

    let active_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .map_err(internal)?;

    let wallet_pool: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(balance), 0) FROM wallet")
        .fetch_one(&state.db)
        .await
        .map_err(internal)?;

    Ok(Json(DashboardStats {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
        monthly_revenue,
        monthly_expenses,
        active_customers,
        wallet_pool,
    }))
}

#[instrument(skip(state))]
pub async fn analytics_stats(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsStats>, (StatusCode, String)> {
    let start = OffsetDateTime::now_utc().date() - Duration::days(30);

    let revenue_by_day = daily_sums(
        &state.db,
        "SELECT log_date, SUM(total_cost) FROM daily_logs WHERE log_date >= $1 GROUP BY log_date",
        start,
    )
    .await
    .map_err(internal)?;
    let expenses_by_day = daily_sums(
        &state.db,
        "SELECT expense_date, SUM(amount) FROM expenses WHERE expense_date >= $1 GROUP BY expense_date",
        start,
    )
    .await
    .map_err(internal)?;

    let total_revenue: f64 = revenue_by_day.values().sum();
    let total_expenses: f64 = expenses_by_day.values().sum();

    let (standard_count, special_count): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(CASE WHEN is_special = false THEN 1 END),
               COUNT(CASE WHEN is_special = true THEN 1 END)
        FROM daily_logs
        "#,
    )
    .fetch_one(&state.db)
    .await
    .map_err(internal)?;

    let (lunch_count, dinner_count): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(CASE WHEN meal_type = 'lunch' THEN 1 END),
               COUNT(CASE WHEN meal_type = 'dinner' THEN 1 END)
        FROM daily_logs
        "#,
    )
    .fetch_one(&state.db)
    .await
    .map_err(internal)?;

    let mut meal_types = HashMap::new();
    meal_types.insert("Standard".to_string(), standard_count);
    meal_types.insert("Special".to_string(), special_count);

    let mut shifts = HashMap::new();
    shifts.insert("Lunch".to_string(), lunch_count);
    shifts.insert("Dinner".to_string(), dinner_count);

    Ok(Json(AnalyticsStats {
        trends: fill_trends(start, &revenue_by_day, &expenses_by_day),
        meal_types,
        shifts,
        total_revenue,
        total_expenses,
        profit_percentage: profit_percentage(total_revenue, total_expenses),
    }))
}

async fn daily_sums(db: &PgPool, query: &str, start: Date) -> anyhow::Result<HashMap<Date, f64>> {
    let rows: Vec<(Date, f64)> = sqlx::query_as(query).bind(start).fetch_all(db).await?;
    Ok(rows.into_iter().collect())
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
