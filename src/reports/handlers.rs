use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tracing::instrument;

use crate::entries;
use crate::state::AppState;
use crate::users::repo::UserWithBalance;

use super::dto::{assemble, BillParams, BillReport};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/reports/bill", get(get_bill))
}

#[instrument(skip(state))]
pub async fn get_bill(
    State(state): State<AppState>,
    Query(params): Query<BillParams>,
) -> Result<Json<BillReport>, (StatusCode, String)> {
    if params.end_date < params.start_date {
        return Err((StatusCode::BAD_REQUEST, "end_date before start_date".into()));
    }

    let Some(user) = UserWithBalance::find(&state.db, params.user_id)
        .await
        .map_err(internal)?
    else {
        return Err((StatusCode::NOT_FOUND, "User not found".into()));
    };

    let logs =
        entries::repo::list_for_user_range(&state.db, params.user_id, params.start_date, params.end_date)
            .await
            .map_err(internal)?;

    let opening_balance = opening_balance(&state.db, params.user_id, params.start_date)
        .await
        .map_err(internal)?;
    let total_recharges =
        recharges_in_period(&state.db, params.user_id, params.start_date, params.end_date)
            .await
            .map_err(internal)?;

    Ok(Json(assemble(
        user,
        params.start_date,
        params.end_date,
        logs,
        opening_balance,
        total_recharges,
    )))
}

/// Balance right before the billing period: the `balance_after` of the last
/// confirmed transaction before the start date, or 0 for a fresh wallet.
async fn opening_balance(db: &PgPool, user_id: i64, start: Date) -> anyhow::Result<f64> {
    let row: Option<Option<f64>> = sqlx::query_scalar(
        r#"
        SELECT balance_after
        FROM wallet_transactions
        WHERE user_id = $1
          AND status = 'confirmed'
          AND created_at < $2
        ORDER BY created_at DESC, txn_id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(start_of_day(start))
    .fetch_optional(db)
    .await?;
    Ok(row.flatten().unwrap_or(0.0))
}

async fn recharges_in_period(
    db: &PgPool,
    user_id: i64,
    start: Date,
    end: Date,
) -> anyhow::Result<f64> {
    let total: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM wallet_transactions
        WHERE user_id = $1
          AND txn_type = 'recharge'
          AND status = 'confirmed'
          AND created_at >= $2
          AND created_at < $3
        "#,
    )
    .bind(user_id)
    .bind(start_of_day(start))
    .bind(start_of_next_day(end))
    .fetch_one(db)
    .await?;
    Ok(total)
}

fn start_of_day(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

fn start_of_next_day(date: Date) -> OffsetDateTime {
    date.next_day().unwrap_or(date).midnight().assume_utc()
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn day_boundaries_are_utc_midnights() {
        let d = date!(2025 - 05 - 31);
        assert_eq!(start_of_day(d).date(), d);
        assert_eq!(start_of_day(d).time(), time::Time::MIDNIGHT);
        assert!(start_of_day(d).offset().is_utc());
        assert_eq!(start_of_next_day(d).date(), date!(2025 - 06 - 01));
    }
}
