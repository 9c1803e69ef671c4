use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::auth::otp::is_valid_mobile;
use crate::state::AppState;

use super::dto::{is_valid_plan, CreateUserRequest, UpdateAddressRequest, UpdatePlanRequest};
use super::repo::{User, UserWithBalance};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id/address", put(update_address))
        .route("/users/:id/plan", put(update_plan))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithBalance>>, (StatusCode, String)> {
    let users = UserWithBalance::list(&state.db).await.map_err(internal)?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserWithBalance>), (StatusCode, String)> {
    if !is_valid_mobile(&payload.mobile_no) {
        warn!(mobile_no = %payload.mobile_no, "invalid mobile number");
        return Err((StatusCode::BAD_REQUEST, "Invalid mobile number".into()));
    }
    if !is_valid_plan(&payload.plan) {
        return Err((StatusCode::BAD_REQUEST, "Invalid plan".into()));
    }
    if payload.role.is_empty() {
        payload.role = "normal".into();
    }
    if payload.role != "normal" && payload.role != "admin" {
        return Err((StatusCode::BAD_REQUEST, "Invalid role".into()));
    }

    match User::find_by_mobile(&state.db, &payload.mobile_no).await {
        Ok(Some(_)) => {
            warn!(mobile_no = %payload.mobile_no, "mobile number already registered");
            return Err((
                StatusCode::CONFLICT,
                "Mobile number already registered".into(),
            ));
        }
        Ok(None) => {}
        Err(e) => return Err(internal(e)),
    }

    let user = UserWithBalance::create(
        &state.db,
        &payload.name,
        &payload.mobile_no,
        &payload.building_no,
        &payload.room_no,
        &payload.role,
        &payload.plan,
    )
    .await
    .map_err(internal)?;

    info!(user_id = user.user_id, "customer created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_address(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAddressRequest>,
) -> Result<Json<User>, (StatusCode, String)> {
    require_self_or_admin(&auth, id)?;

    match User::update_address(&state.db, id, &payload.building_no, &payload.room_no)
        .await
        .map_err(internal)?
    {
        Some(user) => Ok(Json(user)),
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<User>, (StatusCode, String)> {
    require_self_or_admin(&auth, id)?;

    if !is_valid_plan(&payload.plan) {
        return Err((StatusCode::BAD_REQUEST, "Invalid plan".into()));
    }

    match User::update_plan(&state.db, id, &payload.plan)
        .await
        .map_err(internal)?
    {
        Some(user) => Ok(Json(user)),
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

fn require_self_or_admin(auth: &AuthUser, id: i64) -> Result<(), (StatusCode, String)> {
    if auth.user_id != id && auth.role != "admin" {
        warn!(user_id = auth.user_id, target = id, "forbidden user update");
        return Err((StatusCode::FORBIDDEN, "Not allowed".into()));
    }
    Ok(())
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
