use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::Data;

pub mod auth;
pub mod comments;
pub mod memos;
pub mod quotes;
pub mod status;

pub fn router(data: Data) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/status", get(status::status))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/quotes",
            get(quotes::list_quotes).post(quotes::create_quote),
        )
        .route("/api/quotes/today", get(quotes::today_quote))
        .route("/api/quotes/by-date/{date}", get(quotes::quote_by_date))
        .route("/api/quotes/reset", post(quotes::reset_quotes))
        .route(
            "/api/quotes/{id}/comments",
            get(comments::list_comments).post(comments::post_comment),
        )
        .route("/api/memos", get(memos::list_memos))
        .route(
            "/api/memos/{date}",
            get(memos::get_memo)
                .post(memos::set_memo)
                .delete(memos::delete_memo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(data)
}
