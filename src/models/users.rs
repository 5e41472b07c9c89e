use serde::Serialize;
use sqlx::{FromRow, Pool, Sqlite};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::models::is_unique_violation;

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn create(
    db: &Pool<Sqlite>,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let result = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "this email address is already registered.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_email(db: &Pool<Sqlite>, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
            SELECT *
            FROM users
            WHERE email = $1;
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(user)
}
