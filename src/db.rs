use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::config::DatabaseConfig;

/// Opens the process-wide pool. Called once before serving traffic.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let mut options = PgConnectOptions::from_str(&cfg.url).context("parse DATABASE_URL")?;
    if let Some(name) = &cfg.name {
        options = options.database(name);
    }

    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}
