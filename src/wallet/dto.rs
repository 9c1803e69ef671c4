use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct RechargeRequest {
    pub user_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub ref_id: Option<String>,
    /// Recorded as the transaction's created_at; defaults to now. Lets the
    /// admin backfill recharges that happened on paper days ago.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub txn_date: Option<OffsetDateTime>,
}
