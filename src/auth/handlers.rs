use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::state::AppState;
use crate::users::repo::User;

use super::dto::{
    AuthResponse, PublicUser, RefreshRequest, RequestOtpRequest, VerifyOtpRequest,
};
use super::jwt::{AuthUser, JwtKeys};
use super::otp;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/request-otp", post(request_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn request_otp(
    State(state): State<AppState>,
    Json(payload): Json<RequestOtpRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !otp::is_valid_mobile(&payload.mobile_no) {
        warn!(mobile_no = %payload.mobile_no, "invalid mobile number");
        return Err((StatusCode::BAD_REQUEST, "Invalid mobile number".into()));
    }

    // Codes are only issued for registered customers, same as the OTP
    // channel would behave against the customer directory.
    match User::find_by_mobile(&state.db, &payload.mobile_no).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(mobile_no = %payload.mobile_no, "otp requested for unknown mobile");
            return Err((StatusCode::NOT_FOUND, "Unknown mobile number".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_mobile failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    otp::issue(&state.db, &payload.mobile_no, state.config.otp_ttl_minutes)
        .await
        .map_err(|e| {
            error!(error = %e, "otp issue failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(mobile_no = %payload.mobile_no, "otp sent");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let ok = otp::verify(&state.db, &payload.mobile_no, &payload.otp)
        .await
        .map_err(|e| {
            error!(error = %e, "otp verify failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    if !ok {
        warn!(mobile_no = %payload.mobile_no, "otp rejected");
        return Err((StatusCode::UNAUTHORIZED, "Invalid or expired code".into()));
    }

    let user = match User::find_by_mobile(&state.db, &payload.mobile_no).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return Err((StatusCode::UNAUTHORIZED, "Unknown mobile number".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_mobile failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign_access(user.user_id, &user.role)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let refresh_token = keys
        .sign_refresh(user.user_id, &user.role)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(user_id = user.user_id, "user authenticated");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, format!("{}", e)))?;

    // Re-read the user so a role change invalidates stale refresh claims.
    let user = match User::find_by_id(&state.db, claims.sub).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err((StatusCode::UNAUTHORIZED, "User not found".into())),
        Err(e) => {
            error!(error = %e, "find_by_id failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let access_token = keys
        .sign_access(user.user_id, &user.role)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let refresh_token = keys
        .sign_refresh(user.user_id, &user.role)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = match User::find_by_id(&state.db, auth.user_id).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err((StatusCode::UNAUTHORIZED, "User not found".into())),
        Err(e) => {
            error!(error = %e, user_id = auth.user_id, "user lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    Ok(Json(user.into()))
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            user_id: 12,
            name: "Test Customer".into(),
            mobile_no: "9876543210".into(),
            role: "normal".into(),
            plan: "monthly".into(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("9876543210"));
        assert!(json.contains("user_id"));
    }
}
