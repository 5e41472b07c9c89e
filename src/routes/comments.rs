use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::MaybeUser;
use crate::error::AppError;
use crate::models::comments::{self, QuoteComment};
use crate::Data;

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub content: String,
    #[serde(default)]
    pub is_public: bool,
}

#[tracing::instrument(skip(data, user))]
pub async fn list_comments(
    State(data): State<Data>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<QuoteComment>>, AppError> {
    let comments = comments::list_visible(&data.db, id, user.map(|u| u.id)).await?;

    Ok(Json(comments))
}

/// Comments are attributed to the session user when one is present. An
/// anonymous private comment would be visible to nobody, so private posts
/// require a session.
#[tracing::instrument(skip(data, user, req))]
pub async fn post_comment(
    State(data): State<Data>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    Json(req): Json<NewCommentRequest>,
) -> Result<Json<QuoteComment>, AppError> {
    if !req.is_public && user.is_none() {
        return Err(AppError::Unauthorized);
    }

    let comment = comments::create(
        &data.db,
        id,
        user.map(|u| u.id),
        &req.content,
        req.is_public,
    )
    .await?;

    Ok(Json(comment))
}
