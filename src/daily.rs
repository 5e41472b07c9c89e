//! Daily quote assignment.
//!
//! Each calendar day (midnight UTC) is lazily bound to one quote on first
//! access. The UNIQUE constraint on `daily_quotes.date` is the only
//! concurrency control: concurrent first resolutions race on the insert
//! and every loser converges on the winner's row.

use futures::StreamExt;
use rand::Rng;
use sqlx::{Pool, Sqlite};
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime, UtcOffset};
use tracing::Instrument;

use crate::error::AppError;
use crate::models::is_unique_violation;
use crate::models::quotes::{self, Quote};
use crate::Data;

/// Normalize user input to a canonical UTC calendar day. Accepts a plain
/// `YYYY-MM-DD`, or an RFC 3339 datetime in any offset (converted to UTC
/// before the date is taken).
pub fn canonical_date(input: &str) -> Result<Date, AppError> {
    let date_only = time::macros::format_description!("[year]-[month]-[day]");

    if let Ok(date) = Date::parse(input, &date_only) {
        return Ok(date);
    }

    OffsetDateTime::parse(input, &Rfc3339)
        .map(|dt| dt.to_offset(UtcOffset::UTC).date())
        .map_err(|_| AppError::Validation(format!("invalid date: {input}")))
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

async fn assigned_quote(db: &Pool<Sqlite>, date: Date) -> Result<Option<Quote>, AppError> {
    let quote = sqlx::query_as::<_, Quote>(
        r#"
            SELECT
                q.id, q.text, q.text_en, q.author, q.episode, q.episode_en,
                q.episode_short, q.episode_short_en, q.source_title,
                q.source_url, q.tags, q.created_at
            FROM daily_quotes d
            JOIN quotes q ON q.id = d.quote_id
            WHERE d.date = $1;
        "#,
    )
    .bind(date)
    .fetch_optional(db)
    .await?;

    Ok(quote)
}

/// Returns the quote bound to `date`, assigning one on first access.
///
/// An empty pool yields [`Quote::placeholder`] and persists nothing; once
/// any resolution commits, every later call returns the same quote until a
/// bulk reset.
#[tracing::instrument(skip(db))]
pub async fn quote_for_date(db: &Pool<Sqlite>, date: Date) -> Result<Quote, AppError> {
    if let Some(quote) = assigned_quote(db, date).await? {
        return Ok(quote);
    }

    let count = quotes::count(db).await?;

    if count == 0 {
        return Ok(Quote::placeholder());
    }

    let offset = rand::thread_rng().gen_range(0..count);
    let candidate = quotes::fetch_by_offset(db, offset).await?;

    let inserted = sqlx::query(
        r#"
            INSERT INTO daily_quotes (date, quote_id, created_at)
            VALUES ($1, $2, $3);
        "#,
    )
    .bind(date)
    .bind(candidate.id)
    .bind(OffsetDateTime::now_utc())
    .execute(db)
    .await;

    match inserted {
        Ok(_) => Ok(candidate),
        // a concurrent resolution for the same date committed first; its
        // assignment wins
        Err(e) if is_unique_violation(&e) => match assigned_quote(db, date).await? {
            Some(quote) => Ok(quote),
            None => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    }
}

/// Resolves today's quote once an hour so the first visitor of a new UTC
/// day usually hits the read-only path.
pub fn spawn_background_tasks(data: &Data) {
    let data = data.clone();

    tracing::info!("initialized daily quote prewarmer!");

    tokio::spawn(
        async move {
            let interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            let task = futures::stream::unfold(interval, |mut interval| async {
                interval.tick().await;

                if let Err(e) = quote_for_date(&data.db, today_utc()).await {
                    tracing::error!(err = ?e, "an error occurred when prewarming today's quote");
                }

                Some(((), interval))
            });

            task.for_each(|_| async {}).await;
        }
        .in_current_span(),
    );
}
