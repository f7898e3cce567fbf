use sqlx::SqlitePool;

/// Shared application state / Trạng thái dùng chung của ứng dụng
pub struct AppState {
    pub db: SqlitePool,
}
