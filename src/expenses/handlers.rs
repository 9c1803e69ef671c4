use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::state::AppState;

use super::dto::{Expense, ExpenseListParams, ExpenseRequest};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/expenses", get(list_expenses))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses/:id", put(update_expense))
        .route("/expenses/:id", delete(delete_expense))
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<Vec<Expense>>, (StatusCode, String)> {
    let range = match (params.start_date, params.end_date) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };
    let expenses = repo::list(&state.db, range).await.map_err(internal)?;
    Ok(Json(expenses))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<ExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), (StatusCode, String)> {
    validate(&payload)?;
    let expense = repo::create(&state.db, payload.expense_date, &payload.reason, payload.amount)
        .await
        .map_err(internal)?;
    info!(expense_id = expense.expense_id, amount = expense.amount, "expense recorded");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseRequest>,
) -> Result<Json<Expense>, (StatusCode, String)> {
    validate(&payload)?;
    match repo::update(&state.db, id, payload.expense_date, &payload.reason, payload.amount)
        .await
        .map_err(internal)?
    {
        Some(expense) => Ok(Json(expense)),
        None => Err((StatusCode::NOT_FOUND, "Expense not found".into())),
    }
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    if repo::delete(&state.db, id).await.map_err(internal)? {
        Ok(StatusCode::OK)
    } else {
        Err((StatusCode::NOT_FOUND, "Expense not found".into()))
    }
}

fn validate(payload: &ExpenseRequest) -> Result<(), (StatusCode, String)> {
    if payload.reason.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Reason is required".into()));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Amount must be positive".into()));
    }
    Ok(())
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
