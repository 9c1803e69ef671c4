use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Business overhead unrelated to a specific customer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub expense_id: i64,
    #[serde(with = "crate::dates::iso_date")]
    pub expense_date: Date,
    pub reason: String,
    pub amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    #[serde(with = "crate::dates::iso_date")]
    pub expense_date: Date,
    pub reason: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    #[serde(default, with = "crate::dates::iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "crate::dates::iso_date::option")]
    pub end_date: Option<Date>,
}
