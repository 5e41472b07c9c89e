use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::daily;
use crate::error::AppError;
use crate::models::quotes::{self, NewQuote, Quote, QuoteFilter};
use crate::Data;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Quote>,
    pub meta: ListMeta,
}

#[tracing::instrument(skip(data))]
pub async fn list_quotes(
    State(data): State<Data>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let filter = QuoteFilter {
        search: params.search.unwrap_or_default(),
        tag: params.tag.unwrap_or_default(),
        limit,
        offset: (page - 1) * limit,
    };

    let (quotes, total) = quotes::list(&data.db, &filter).await?;

    Ok(Json(ListResponse {
        data: quotes,
        meta: ListMeta {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        },
    }))
}

#[tracing::instrument(skip_all)]
pub async fn create_quote(
    State(data): State<Data>,
    Json(new): Json<NewQuote>,
) -> Result<Json<Quote>, AppError> {
    let quote = quotes::create(&data.db, &new).await?;

    tracing::info!(id = quote.id, author = %quote.author, "added quote.");

    Ok(Json(quote))
}

#[tracing::instrument(skip(data))]
pub async fn today_quote(State(data): State<Data>) -> Result<Json<Quote>, AppError> {
    let quote = daily::quote_for_date(&data.db, daily::today_utc()).await?;

    Ok(Json(quote))
}

#[tracing::instrument(skip(data))]
pub async fn quote_by_date(
    State(data): State<Data>,
    Path(date): Path<String>,
) -> Result<Json<Quote>, AppError> {
    let date = daily::canonical_date(&date)?;
    let quote = daily::quote_for_date(&data.db, date).await?;

    Ok(Json(quote))
}

#[tracing::instrument(skip_all)]
pub async fn reset_quotes(State(data): State<Data>) -> Result<Json<serde_json::Value>, AppError> {
    quotes::reset_all(&data.db).await?;

    tracing::info!("quote data reset; ready for reseeding.");

    Ok(Json(json!({ "message": "reset successful." })))
}
