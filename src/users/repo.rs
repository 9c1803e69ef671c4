use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub mobile_no: String,
    pub building_no: String,
    pub room_no: String,
    pub role: String,
    pub plan: String,
}

/// User joined with their wallet balance, the shape the admin panel works
/// with everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserWithBalance {
    pub user_id: i64,
    pub name: String,
    pub mobile_no: String,
    pub building_no: String,
    pub room_no: String,
    pub role: String,
    pub plan: String,
    pub balance: f64,
}

impl User {
    pub async fn find_by_mobile(db: &PgPool, mobile_no: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, mobile_no, building_no, room_no, role, plan
            FROM users
            WHERE mobile_no = $1
            "#,
        )
        .bind(mobile_no)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, user_id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, mobile_no, building_no, room_no, role, plan
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_address(
        db: &PgPool,
        user_id: i64,
        building_no: &str,
        room_no: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET building_no = $1, room_no = $2
            WHERE user_id = $3
            RETURNING user_id, name, mobile_no, building_no, room_no, role, plan
            "#,
        )
        .bind(building_no)
        .bind(room_no)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_plan(db: &PgPool, user_id: i64, plan: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET plan = $1
            WHERE user_id = $2
            RETURNING user_id, name, mobile_no, building_no, room_no, role, plan
            "#,
        )
        .bind(plan)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}

impl UserWithBalance {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<UserWithBalance>> {
        let rows = sqlx::query_as::<_, UserWithBalance>(
            r#"
            SELECT u.user_id, u.name, u.mobile_no, u.building_no, u.room_no,
                   u.role, u.plan, COALESCE(w.balance, 0) AS balance
            FROM users u
            LEFT JOIN wallet w ON u.user_id = w.user_id
            ORDER BY u.name ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, user_id: i64) -> anyhow::Result<Option<UserWithBalance>> {
        let row = sqlx::query_as::<_, UserWithBalance>(
            r#"
            SELECT u.user_id, u.name, u.mobile_no, u.building_no, u.room_no,
                   u.role, u.plan, COALESCE(w.balance, 0) AS balance
            FROM users u
            LEFT JOIN wallet w ON u.user_id = w.user_id
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Creates the user together with their zero-balance wallet row.
    pub async fn create(
        db: &PgPool,
        name: &str,
        mobile_no: &str,
        building_no: &str,
        room_no: &str,
        role: &str,
        plan: &str,
    ) -> anyhow::Result<UserWithBalance> {
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, mobile_no, building_no, room_no, role, plan)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, name, mobile_no, building_no, room_no, role, plan
            "#,
        )
        .bind(name)
        .bind(mobile_no)
        .bind(building_no)
        .bind(room_no)
        .bind(role)
        .bind(plan)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO wallet (user_id, balance) VALUES ($1, 0)")
            .bind(user.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(UserWithBalance {
            user_id: user.user_id,
            name: user.name,
            mobile_no: user.mobile_no,
            building_no: user.building_no,
            room_no: user.room_no,
            role: user.role,
            plan: user.plan,
            balance: 0.0,
        })
    }
}
