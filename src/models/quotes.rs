use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Sqlite};
use time::OffsetDateTime;

use crate::error::AppError;

/// Fixed id of the non-persisted placeholder quote. Real rows start at 1.
pub const PLACEHOLDER_QUOTE_ID: i64 = 0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub text_en: Option<String>,
    pub author: String,
    pub episode: Option<String>,
    pub episode_en: Option<String>,
    pub episode_short: Option<String>,
    pub episode_short_en: Option<String>,
    pub source_title: Option<String>,
    pub source_url: Option<String>,
    pub tags: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Quote {
    /// Returned when the pool is empty. Never persisted.
    pub fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_QUOTE_ID,
            text: "名言がまだ登録されていません。".to_string(),
            text_en: None,
            author: "システム".to_string(),
            episode: Some("データベースに名言を追加してください。".to_string()),
            episode_en: None,
            episode_short: Some("名言募集中".to_string()),
            episode_short_en: None,
            source_title: None,
            source_url: None,
            tags: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewQuote {
    pub text: String,
    pub text_en: Option<String>,
    pub author: String,
    pub episode: Option<String>,
    pub episode_en: Option<String>,
    pub episode_short: Option<String>,
    pub episode_short_en: Option<String>,
    pub source_title: Option<String>,
    pub source_url: Option<String>,
    pub tags: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct QuoteFilter {
    pub search: String,
    pub tag: String,
    pub limit: i64,
    pub offset: i64,
}

pub async fn count(db: &Pool<Sqlite>) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes;")
        .fetch_one(db)
        .await?;

    Ok(count)
}

/// The Nth quote in a stable ordering. Pairs with [`count`] for random
/// selection over the current pool.
pub async fn fetch_by_offset(db: &Pool<Sqlite>, offset: i64) -> Result<Quote, AppError> {
    let quote = sqlx::query_as::<_, Quote>(
        r#"
            SELECT *
            FROM quotes
            ORDER BY id
            LIMIT 1 OFFSET $1;
        "#,
    )
    .bind(offset)
    .fetch_one(db)
    .await?;

    Ok(quote)
}

pub async fn create(db: &Pool<Sqlite>, new: &NewQuote) -> Result<Quote, AppError> {
    if new.text.trim().is_empty() {
        return Err(AppError::Validation("quote text is required.".to_string()));
    }

    if new.author.trim().is_empty() {
        return Err(AppError::Validation(
            "quote author is required.".to_string(),
        ));
    }

    let quote = sqlx::query_as::<_, Quote>(
        r#"
            INSERT INTO quotes (
                text, text_en, author, episode, episode_en,
                episode_short, episode_short_en, source_title, source_url,
                tags, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(&new.text)
    .bind(&new.text_en)
    .bind(&new.author)
    .bind(&new.episode)
    .bind(&new.episode_en)
    .bind(&new.episode_short)
    .bind(&new.episode_short_en)
    .bind(&new.source_title)
    .bind(&new.source_url)
    .bind(&new.tags)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;

    Ok(quote)
}

/// Paged listing, newest first. An empty search or tag disables that filter.
pub async fn list(db: &Pool<Sqlite>, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
    let quotes = sqlx::query_as::<_, Quote>(
        r#"
            SELECT *
            FROM quotes
            WHERE ($1 = '' OR text LIKE '%' || $1 || '%' OR author LIKE '%' || $1 || '%')
              AND ($2 = '' OR tags LIKE '%' || $2 || '%')
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4;
        "#,
    )
    .bind(&filter.search)
    .bind(&filter.tag)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(db)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
            SELECT COUNT(*)
            FROM quotes
            WHERE ($1 = '' OR text LIKE '%' || $1 || '%' OR author LIKE '%' || $1 || '%')
              AND ($2 = '' OR tags LIKE '%' || $2 || '%');
        "#,
    )
    .bind(&filter.search)
    .bind(&filter.tag)
    .fetch_one(db)
    .await?;

    Ok((quotes, total))
}

/// Destructive bulk reset: every assignment, comment and quote is deleted.
/// Intended for reseeding only.
pub async fn reset_all(db: &Pool<Sqlite>) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM daily_quotes;")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM quote_comments;")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM quotes;").execute(&mut *tx).await?;

    tx.commit().await?;

    Ok(())
}
