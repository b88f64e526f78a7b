use std::sync::Arc;

use gonawin_backend::api::{self, AppState};
use gonawin_backend::config::Config;
use gonawin_backend::db::Database;
use gonawin_backend::metrics;
use gonawin_backend::tasks::{spawn_task_worker, OutboxMailer, TaskQueue};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    metrics::register_metrics();

    let config = Config::load();
    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    // Background worker for invite mails and score updates
    let tasks = TaskQueue::new();
    spawn_task_worker(
        db.clone(),
        tasks.clone(),
        OutboxMailer::new(db.clone()),
        config.mail_sender.clone(),
        config.task_poll,
    );

    let port = config.port;
    let app = api::router(AppState::new(db, tasks, config));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to port {port}: {e}"));

    tracing::info!("Gonawin backend listening on port {port}");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
