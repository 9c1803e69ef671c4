use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::state::AppState;

use super::dto::RechargeRequest;
use super::repo;

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/wallet/recharge", post(recharge_wallet))
}

#[instrument(skip(state, payload))]
pub async fn recharge_wallet(
    State(state): State<AppState>,
    Json(payload): Json<RechargeRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Amount must be positive".into()));
    }

    let txn_date = payload.txn_date.unwrap_or_else(OffsetDateTime::now_utc);

    let mut tx = state.db.begin().await.map_err(internal)?;
    let balance = repo::recharge(
        &mut tx,
        payload.user_id,
        payload.amount,
        payload.ref_id.as_deref(),
        txn_date,
    )
    .await
    .map_err(internal)?;
    tx.commit().await.map_err(internal)?;

    info!(user_id = payload.user_id, amount = payload.amount, balance, "recharge confirmed");
    Ok(StatusCode::OK)
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
