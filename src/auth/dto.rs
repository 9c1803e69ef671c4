use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub mobile_no: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub mobile_no: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub user_id: i64,
    pub name: String,
    pub mobile_no: String,
    pub role: String,
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

impl From<crate::users::repo::User> for PublicUser {
    fn from(u: crate::users::repo::User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            mobile_no: u.mobile_no,
            role: u.role,
            plan: u.plan,
        }
    }
}
