use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Sqlite};
use time::OffsetDateTime;

use crate::error::AppError;

/// A comment on a quote. `user_id` is `None` for anonymous posts; a
/// non-null `deleted_at` hides the row from every listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuoteComment {
    pub id: i64,
    pub quote_id: i64,
    pub user_id: Option<i64>,
    pub content: String,
    pub is_public: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

/// Visible = public, or owned by the viewer. Newest first.
pub async fn list_visible(
    db: &Pool<Sqlite>,
    quote_id: i64,
    viewer: Option<i64>,
) -> Result<Vec<QuoteComment>, AppError> {
    // -1 never matches a real user id, so anonymous viewers only see
    // public comments
    let comments = sqlx::query_as::<_, QuoteComment>(
        r#"
            SELECT *
            FROM quote_comments
            WHERE quote_id = $1
              AND deleted_at IS NULL
              AND (is_public = 1 OR user_id = $2)
            ORDER BY created_at DESC, id DESC;
        "#,
    )
    .bind(quote_id)
    .bind(viewer.unwrap_or(-1))
    .fetch_all(db)
    .await?;

    Ok(comments)
}

pub async fn create(
    db: &Pool<Sqlite>,
    quote_id: i64,
    user_id: Option<i64>,
    content: &str,
    is_public: bool,
) -> Result<QuoteComment, AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "comment content is required.".to_string(),
        ));
    }

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes WHERE id = $1;")
        .bind(quote_id)
        .fetch_one(db)
        .await?;

    if exists == 0 {
        return Err(AppError::NotFound);
    }

    let comment = sqlx::query_as::<_, QuoteComment>(
        r#"
            INSERT INTO quote_comments (quote_id, user_id, content, is_public, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(quote_id)
    .bind(user_id)
    .bind(content)
    .bind(is_public)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;

    Ok(comment)
}
