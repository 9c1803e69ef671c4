use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::state::AppState;
use crate::wallet;

use super::dto::{DailyLog, EntryRequest, ListParams};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/daily-entry", get(list_entries))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-entry", post(create_entry))
        .route("/daily-entry/:id", put(update_entry))
        .route("/daily-entry/:id", delete(delete_entry))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DailyLog>>, (StatusCode, String)> {
    let logs = repo::list_for_date(&state.db, params.date, params.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(logs))
}

/// POST /daily-entry — records the meal and debits the customer's wallet
/// in one transaction.
#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<EntryRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    validate_meal_type(&payload.meal_type)?;
    let total_cost = payload.cost();

    let mut tx = state.db.begin().await.map_err(internal)?;
    let log_id = repo::insert(&mut tx, &payload, total_cost)
        .await
        .map_err(internal)?;
    let balance = wallet::repo::debit(&mut tx, payload.user_id, total_cost)
        .await
        .map_err(internal)?;
    tx.commit().await.map_err(internal)?;

    info!(log_id, user_id = payload.user_id, total_cost, balance, "entry recorded");
    Ok(StatusCode::CREATED)
}

/// PUT /daily-entry/:id — rewrites the entry and settles the cost
/// difference against the wallet.
#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EntryRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    validate_meal_type(&payload.meal_type)?;
    let new_cost = payload.cost();

    let mut tx = state.db.begin().await.map_err(internal)?;

    let Some((user_id, old_cost)) = repo::cost_info(&mut tx, id).await.map_err(internal)? else {
        return Err((StatusCode::NOT_FOUND, "Entry not found".into()));
    };

    repo::update(&mut tx, id, &payload, new_cost)
        .await
        .map_err(internal)?;
    wallet::repo::adjust(&mut tx, user_id, new_cost - old_cost)
        .await
        .map_err(internal)?;

    tx.commit().await.map_err(internal)?;

    info!(log_id = id, user_id, old_cost, new_cost, "entry updated");
    Ok(StatusCode::OK)
}

/// DELETE /daily-entry/:id — removes the entry and refunds its stored cost.
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut tx = state.db.begin().await.map_err(internal)?;

    let Some((user_id, total_cost)) = repo::cost_info(&mut tx, id).await.map_err(internal)? else {
        return Err((StatusCode::NOT_FOUND, "Entry not found".into()));
    };

    repo::delete(&mut tx, id).await.map_err(internal)?;
    wallet::repo::refund(&mut tx, user_id, total_cost)
        .await
        .map_err(internal)?;

    tx.commit().await.map_err(internal)?;

    info!(log_id = id, user_id, total_cost, "entry deleted and refunded");
    Ok(StatusCode::OK)
}

fn validate_meal_type(meal_type: &str) -> Result<(), (StatusCode, String)> {
    if meal_type == "lunch" || meal_type == "dinner" {
        Ok(())
    } else {
        Err((StatusCode::BAD_REQUEST, "Invalid meal type".into()))
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
