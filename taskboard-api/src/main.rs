//! # Taskboard API Server
//!
//! Project/task tracking backend: authenticated users own projects,
//! projects contain tasks, tasks may be assigned to users, and task
//! creation writes an activity log entry plus a best-effort notification
//! email.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use std::sync::Arc;

use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    db::{migrations::run_migrations, pool},
    mail::{HttpMailer, Mailer, NoopMailer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let mailer: Arc<dyn Mailer> = match config.mail.endpoint.clone() {
        Some(endpoint) => Arc::new(HttpMailer::new(
            endpoint,
            config.mail.api_key.clone(),
            config.mail.from.clone(),
        )),
        None => {
            tracing::warn!("MAIL_API_URL not set, assignment emails will be discarded");
            Arc::new(NoopMailer)
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install ctrl-c handler");
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
