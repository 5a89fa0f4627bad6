//! edufinance server.
//!
//! Run from repo root: `cargo run -p edufinance-server`
//! Settings come from the environment (or a `.env` file); see `Settings::from_env`.

use edufinance::{app, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("edufinance=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr.clone();
    let state = AppState::connect(settings).await?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("edufinance listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
