use sqlx::{Pool, Sqlite};

pub mod auth;
pub mod constants;
pub mod daily;
pub mod error;
pub mod init;
pub mod models;
pub mod routes;
pub mod telemetry;

#[derive(Clone)]
pub struct Data {
    pub db: Pool<Sqlite>,
    pub jwt: auth::JwtManager,
}
