//! Health endpoint for deployment probes
//!
//! Serves `GET /healthz`, reporting 200 when the backing Postgres database
//! is reachable and carries the expected schema, and 500 otherwise. The
//! schema probe checks for the `run` table, which the conversation layer
//! writes on every request; its absence means migrations have not run.

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tracing::{error, info};

const REQUIRED_TABLE: &str = "run";

#[derive(Parser, Debug)]
#[command(name = "finagent-server", about = "Financial agent health endpoint")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8000")]
    listen: SocketAddr,

    /// Postgres connection string; falls back to DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Clone)]
struct AppState {
    pool: PgPool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    finagent_core::init_tracing();
    let args = Args::parse();

    let database_url = match args.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set when --database-url is not given")?,
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to Postgres")?;

    let app = Router::new()
        .route("/healthz", get(healthz))
        .with_state(AppState { pool });

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;
    info!(listen = %args.listen, "Health endpoint listening");
    axum::serve(listener, app).await.context("Server exited")?;

    Ok(())
}

/// Database-backed health probe
async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match required_table_exists(&state.pool).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Ok(false) => {
            error!(table = REQUIRED_TABLE, "Health check failed: table missing");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "fail",
                    "reason": format!("table '{REQUIRED_TABLE}' does not exist"),
                })),
            )
        }
        Err(e) => {
            error!(error = %e, "Health check failed: database unreachable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "fail",
                    "reason": e.to_string(),
                })),
            )
        }
    }
}

async fn required_table_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = $1
        )",
    )
    .bind(REQUIRED_TABLE)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}
