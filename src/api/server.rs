use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::ApiResponse;
use crate::state::AppState;

/// GET /api/health - health check / kiểm tra tình trạng dịch vụ
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "GiaSuHub dịch vụ đang hoạt động"
    }))
}

/// Server status / Trạng thái máy chủ
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    pub tutor_count: i64,
    pub subject_count: i64,
}

/// GET /api/server/status
pub async fn get_server_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<ServerStatus>> {
    let tutor_count: Result<i64, _> = sqlx::query_scalar("SELECT COUNT(*) FROM tutors")
        .fetch_one(&state.db)
        .await;
    let subject_count: Result<i64, _> =
        sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE active = 1")
            .fetch_one(&state.db)
            .await;

    match (tutor_count, subject_count) {
        (Ok(tutor_count), Ok(subject_count)) => Json(ApiResponse::success(ServerStatus {
            name: "GiaSuHub".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tutor_count,
            subject_count,
        })),
        _ => Json(ApiResponse::error("Lỗi máy chủ")),
    }
}
