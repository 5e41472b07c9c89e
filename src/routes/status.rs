use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::{version::get_version, STARTUP_TIME};
use crate::error::AppError;
use crate::models::quotes;
use crate::Data;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub about: String,
    pub version: String,
    pub rust: String,
    pub quotes: i64,
    pub uptime_secs: u64,
}

/// Service status: version, toolchain, pool size, uptime.
#[tracing::instrument(skip_all)]
pub async fn status(State(data): State<Data>) -> Result<Json<StatusResponse>, AppError> {
    let count = quotes::count(&data.db).await?;

    let uptime_secs = STARTUP_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or_default();

    Ok(Json(StatusResponse {
        about: "koyomi is a calendar quote-journal backend.".to_string(),
        version: get_version(),
        rust: rustc_version_runtime::version().to_string(),
        quotes: count,
        uptime_secs,
    }))
}
