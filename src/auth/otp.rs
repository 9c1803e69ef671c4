use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::debug;

pub(crate) fn is_valid_mobile(mobile_no: &str) -> bool {
    lazy_static! {
        static ref MOBILE_RE: Regex = Regex::new(r"^\d{10}$").unwrap();
    }
    MOBILE_RE.is_match(mobile_no)
}

pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

/// Stores a fresh code for the mobile number, replacing any earlier one.
pub async fn issue(db: &PgPool, mobile_no: &str, ttl_minutes: i64) -> anyhow::Result<String> {
    let code = generate_code();
    let expires_at = OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes);

    sqlx::query(
        r#"
        INSERT INTO otp_codes (mobile_no, code, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (mobile_no) DO UPDATE SET code = $2, expires_at = $3
        "#,
    )
    .bind(mobile_no)
    .bind(&code)
    .bind(expires_at)
    .execute(db)
    .await?;

    // No SMS provider wired up; the code lands in the dev log instead.
    debug!(mobile_no, code, "otp issued");
    Ok(code)
}

/// Checks the code and consumes it. A code is single-use: a successful
/// match deletes the row even before the caller mints tokens.
pub async fn verify(db: &PgPool, mobile_no: &str, code: &str) -> anyhow::Result<bool> {
    let row: Option<(String, OffsetDateTime)> = sqlx::query_as(
        r#"
        SELECT code, expires_at FROM otp_codes WHERE mobile_no = $1
        "#,
    )
    .bind(mobile_no)
    .fetch_optional(db)
    .await?;

    let Some((stored, expires_at)) = row else {
        return Ok(false);
    };

    if stored != code || expires_at < OffsetDateTime::now_utc() {
        return Ok(false);
    }

    sqlx::query("DELETE FROM otp_codes WHERE mobile_no = $1")
        .bind(mobile_no)
        .execute(db)
        .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_validation_requires_ten_digits() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("98765"));
        assert!(!is_valid_mobile("98765432100"));
        assert!(!is_valid_mobile("98765abcde"));
        assert!(!is_valid_mobile("+919876543210"));
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
