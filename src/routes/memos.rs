use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{CurrentUser, MaybeUser};
use crate::daily;
use crate::error::AppError;
use crate::models::memos::{self, Memo, MemoMarker};
use crate::Data;

#[derive(Debug, Deserialize)]
pub struct SetMemoRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[tracing::instrument(skip(data))]
pub async fn get_memo(
    State(data): State<Data>,
    user: CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<Memo>, AppError> {
    let date = daily::canonical_date(&date)?;

    memos::get(&data.db, user.id, date)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Blank content deletes the memo instead of storing an empty one.
#[tracing::instrument(skip(data, req))]
pub async fn set_memo(
    State(data): State<Data>,
    user: CurrentUser,
    Path(date): Path<String>,
    Json(req): Json<SetMemoRequest>,
) -> Result<Response, AppError> {
    let date = daily::canonical_date(&date)?;

    match memos::set(&data.db, user.id, date, &req.content).await? {
        Some(memo) => Ok(Json(memo).into_response()),
        None => Ok(Json(json!({ "message": "deleted empty memo." })).into_response()),
    }
}

#[tracing::instrument(skip(data))]
pub async fn delete_memo(
    State(data): State<Data>,
    user: CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = daily::canonical_date(&date)?;

    memos::delete(&data.db, user.id, date).await?;

    Ok(Json(json!({ "message": "deleted." })))
}

/// Calendar markers for the days in `[from, to]` that have a memo.
/// Anonymous callers get an empty list rather than an error, so the
/// calendar renders without a session.
#[tracing::instrument(skip(data, user))]
pub async fn list_memos(
    State(data): State<Data>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<MemoMarker>>, AppError> {
    let (Some(from), Some(to)) = (params.from, params.to) else {
        return Err(AppError::Validation(
            "missing from/to parameters.".to_string(),
        ));
    };

    let Some(user) = user else {
        return Ok(Json(vec![]));
    };

    let from = daily::canonical_date(&from)?;
    let to = daily::canonical_date(&to)?;

    let markers = memos::list_range(&data.db, user.id, from, to).await?;

    Ok(Json(markers))
}
