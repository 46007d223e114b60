use std::sync::Arc;

use sketchvault::{app, auth, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "sketchvault=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;
    tracing::info!("database ready");

    auth::password::warm_up();

    let state = AppState::postgres(Arc::clone(&config), pool.clone());
    let router = app::build_app(state);
    app::serve(router, &config.host, config.port).await?;

    pool.close().await;
    tracing::info!("database pool closed");
    Ok(())
}
