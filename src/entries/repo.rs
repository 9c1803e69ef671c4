use sqlx::{PgPool, Postgres, Transaction};
use time::Date;

use super::dto::{DailyLog, EntryRequest};

const LOG_COLUMNS: &str = "log_id, user_id, NULL::text AS user_name, log_date, meal_type, \
     has_main_meal, is_special, special_dish_name, extra_rice_qty, extra_roti_qty, \
     extra_chicken_qty, extra_fish_qty, extra_egg_qty, extra_vegetable_qty, total_cost";

/// All entries for a day, joined with the customer name for the entry sheet.
/// `user_id` narrows to one customer; 0 (the UI's "everyone") means all.
pub async fn list_for_date(
    db: &PgPool,
    date: Date,
    user_id: Option<i64>,
) -> anyhow::Result<Vec<DailyLog>> {
    let base = r#"
        SELECT l.log_id, l.user_id, u.name AS user_name, l.log_date, l.meal_type,
               l.has_main_meal, l.is_special, l.special_dish_name,
               l.extra_rice_qty, l.extra_roti_qty, l.extra_chicken_qty,
               l.extra_fish_qty, l.extra_egg_qty, l.extra_vegetable_qty, l.total_cost
        FROM daily_logs l
        JOIN users u ON l.user_id = u.user_id
        WHERE l.log_date = $1
    "#;

    let rows = match user_id {
        Some(uid) if uid != 0 => {
            sqlx::query_as::<_, DailyLog>(&format!(
                "{base} AND l.user_id = $2 ORDER BY u.name ASC, l.meal_type DESC"
            ))
            .bind(date)
            .bind(uid)
            .fetch_all(db)
            .await?
        }
        _ => {
            sqlx::query_as::<_, DailyLog>(&format!("{base} ORDER BY u.name ASC, l.meal_type DESC"))
                .bind(date)
                .fetch_all(db)
                .await?
        }
    };
    Ok(rows)
}

/// Entries for one customer over an inclusive date range (bill reports).
pub async fn list_for_user_range(
    db: &PgPool,
    user_id: i64,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<DailyLog>> {
    let rows = sqlx::query_as::<_, DailyLog>(&format!(
        r#"
        SELECT {LOG_COLUMNS}
        FROM daily_logs
        WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
        ORDER BY log_date ASC, meal_type DESC
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    req: &EntryRequest,
    total_cost: f64,
) -> anyhow::Result<i64> {
    let log_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO daily_logs (user_id, log_date, meal_type, has_main_meal, is_special,
                                special_dish_name, extra_rice_qty, extra_roti_qty,
                                extra_chicken_qty, extra_fish_qty, extra_egg_qty,
                                extra_vegetable_qty, total_cost)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING log_id
        "#,
    )
    .bind(req.user_id)
    .bind(req.log_date)
    .bind(&req.meal_type)
    .bind(req.has_main_meal)
    .bind(req.is_special)
    .bind(&req.special_dish_name)
    .bind(req.extra_rice_qty as i32)
    .bind(req.extra_roti_qty as i32)
    .bind(req.extra_chicken_qty as i32)
    .bind(req.extra_fish_qty as i32)
    .bind(req.extra_egg_qty as i32)
    .bind(req.extra_vegetable_qty as i32)
    .bind(total_cost)
    .fetch_one(&mut **tx)
    .await?;
    Ok(log_id)
}

/// Owner and stored cost of an entry, read inside the caller's transaction
/// so the wallet side effect works against the value actually charged.
pub async fn cost_info(
    tx: &mut Transaction<'_, Postgres>,
    log_id: i64,
) -> anyhow::Result<Option<(i64, f64)>> {
    let row: Option<(i64, f64)> =
        sqlx::query_as("SELECT user_id, total_cost FROM daily_logs WHERE log_id = $1")
            .bind(log_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(row)
}

pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    log_id: i64,
    req: &EntryRequest,
    total_cost: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE daily_logs
        SET meal_type = $1, has_main_meal = $2, is_special = $3, special_dish_name = $4,
            extra_rice_qty = $5, extra_roti_qty = $6, extra_chicken_qty = $7,
            extra_fish_qty = $8, extra_egg_qty = $9, extra_vegetable_qty = $10,
            total_cost = $11
        WHERE log_id = $12
        "#,
    )
    .bind(&req.meal_type)
    .bind(req.has_main_meal)
    .bind(req.is_special)
    .bind(&req.special_dish_name)
    .bind(req.extra_rice_qty as i32)
    .bind(req.extra_roti_qty as i32)
    .bind(req.extra_chicken_qty as i32)
    .bind(req.extra_fish_qty as i32)
    .bind(req.extra_egg_qty as i32)
    .bind(req.extra_vegetable_qty as i32)
    .bind(total_cost)
    .bind(log_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete(tx: &mut Transaction<'_, Postgres>, log_id: i64) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM daily_logs WHERE log_id = $1")
        .bind(log_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
