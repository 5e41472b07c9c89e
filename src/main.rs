use koyomi::constants::STARTUP_TIME;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = &*STARTUP_TIME;

    koyomi::init::init().await
}
