use axum::{
    routing::{get, post},
    Router,
};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod db;
mod state;

use giasuhub_backend::config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giasuhub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration into the global slot, then snapshot it
    // / Nạp cấu hình vào ô toàn cục rồi chụp lại
    config::init_config().expect("Failed to load configuration");
    let app_config = config::config();
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // Create data directory if not exists / Tạo thư mục dữ liệu nếu chưa có
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| app_config.get_database_url());

    let pool = SqlitePool::connect(&database_url).await?;

    db::run_migrations(&pool).await?;

    let state = Arc::new(AppState { db: pool });

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        .route("/api/server/status", get(api::server::get_server_status))
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/tutors", get(api::tutors::list_tutors))
        .route("/api/tutors", post(api::tutors::create_tutor))
        .route("/api/tutors/:id", get(api::tutors::get_tutor))
        .route("/api/tutors/:id", post(api::tutors::update_tutor))
        .route("/api/tutors/:id/status", post(api::tutors::update_status))
        .route("/api/tutors/:id/moderate", post(api::tutors::moderate_tutor))
        .route("/api/subjects", get(api::subjects::list_subjects))
        .route("/api/subjects", post(api::subjects::create_subject))
        .route("/api/subjects/:name", post(api::subjects::update_subject))
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
