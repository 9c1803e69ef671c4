use sqlx::PgPool;
use time::Date;

use super::dto::Expense;

const COLUMNS: &str = "expense_id, expense_date, reason, amount, created_at";

/// Lists expenses, newest first. A date range is applied only when both
/// ends are given, matching how the panel's filter works.
pub async fn list(
    db: &PgPool,
    range: Option<(Date, Date)>,
) -> anyhow::Result<Vec<Expense>> {
    let rows = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, Expense>(&format!(
                r#"
                SELECT {COLUMNS}
                FROM expenses
                WHERE expense_date BETWEEN $1 AND $2
                ORDER BY expense_date DESC, created_at DESC
                "#
            ))
            .bind(start)
            .bind(end)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Expense>(&format!(
                "SELECT {COLUMNS} FROM expenses ORDER BY expense_date DESC, created_at DESC"
            ))
            .fetch_all(db)
            .await?
        }
    };
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    expense_date: Date,
    reason: &str,
    amount: f64,
) -> anyhow::Result<Expense> {
    let expense = sqlx::query_as::<_, Expense>(&format!(
        r#"
        INSERT INTO expenses (expense_date, reason, amount)
        VALUES ($1, $2, $3)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(expense_date)
    .bind(reason)
    .bind(amount)
    .fetch_one(db)
    .await?;
    Ok(expense)
}

pub async fn update(
    db: &PgPool,
    expense_id: i64,
    expense_date: Date,
    reason: &str,
    amount: f64,
) -> anyhow::Result<Option<Expense>> {
    let expense = sqlx::query_as::<_, Expense>(&format!(
        r#"
        UPDATE expenses SET expense_date = $1, reason = $2, amount = $3
        WHERE expense_id = $4
        RETURNING {COLUMNS}
        "#
    ))
    .bind(expense_date)
    .bind(reason)
    .bind(amount)
    .bind(expense_id)
    .fetch_optional(db)
    .await?;
    Ok(expense)
}

pub async fn delete(db: &PgPool, expense_id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM expenses WHERE expense_id = $1")
        .bind(expense_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
