use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Sqlite};
use time::{Date, OffsetDateTime};

use crate::error::AppError;

/// A private note attached to one calendar day, unique per (user, date).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Memo {
    pub id: i64,
    pub user_id: i64,
    pub date: Date,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Minimal "this day has a memo" marker for the calendar view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MemoMarker {
    pub id: i64,
    pub date: Date,
}

pub async fn get(db: &Pool<Sqlite>, user_id: i64, date: Date) -> Result<Option<Memo>, AppError> {
    let memo = sqlx::query_as::<_, Memo>(
        r#"
            SELECT *
            FROM memos
            WHERE user_id = $1 AND date = $2;
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await?;

    Ok(memo)
}

/// Upsert the memo for a day. Blank content deletes instead and returns
/// `None`.
pub async fn set(
    db: &Pool<Sqlite>,
    user_id: i64,
    date: Date,
    content: &str,
) -> Result<Option<Memo>, AppError> {
    if content.trim().is_empty() {
        delete(db, user_id, date).await?;
        return Ok(None);
    }

    let now = OffsetDateTime::now_utc();

    let memo = sqlx::query_as::<_, Memo>(
        r#"
            INSERT INTO memos (user_id, date, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id, date)
            DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(content)
    .bind(now)
    .fetch_one(db)
    .await?;

    Ok(Some(memo))
}

pub async fn delete(db: &Pool<Sqlite>, user_id: i64, date: Date) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
            DELETE FROM memos
            WHERE user_id = $1 AND date = $2;
        "#,
    )
    .bind(user_id)
    .bind(date)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_range(
    db: &Pool<Sqlite>,
    user_id: i64,
    from: Date,
    to: Date,
) -> Result<Vec<MemoMarker>, AppError> {
    let markers = sqlx::query_as::<_, MemoMarker>(
        r#"
            SELECT id, date
            FROM memos
            WHERE user_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date;
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;

    Ok(markers)
}
