use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::Cookies;

use crate::auth::require_admin;
use crate::state::AppState;
use giasuhub_backend::models::{CreateSubjectRequest, Subject, UpdateSubjectRequest};

/// GET /api/subjects - active catalog as a bare array / Danh mục môn học đang bật
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Subject>>, (StatusCode, Json<Value>)> {
    let subjects =
        sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE active = 1 ORDER BY rowid")
            .fetch_all(&state.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load subjects: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Lỗi máy chủ"})),
                )
            })?;

    Ok(Json(subjects))
}

/// POST /api/subjects - admin catalog upkeep / Quản trị viên thêm môn học
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&state, &cookies).await?;

    let name = req.name.trim().to_lowercase();
    let display_name = req.display_name.trim().to_string();
    if name.is_empty() || display_name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Tên môn học không được để trống"})),
        ));
    }

    let existing: Option<String> = sqlx::query_scalar("SELECT name FROM subjects WHERE name = ?")
        .bind(&name)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;
    if existing.is_some() {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({"error": "Môn học đã tồn tại"})),
        ));
    }

    let now = Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO subjects (name, display_name, icon, color, active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(&name)
    .bind(&display_name)
    .bind(&req.icon)
    .bind(&req.color)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create subject: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Tạo môn học thất bại"})),
        )
    })?;

    Ok(Json(json!({
        "name": name,
        "message": "Tạo môn học thành công"
    })))
}

/// POST /api/subjects/:name - partial update, also the on/off switch
/// / Cập nhật môn học, kể cả bật tắt
pub async fn update_subject(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(name): Path<String>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&state, &cookies).await?;

    let existing: Option<String> = sqlx::query_scalar("SELECT name FROM subjects WHERE name = ?")
        .bind(&name)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;
    if existing.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Không tìm thấy môn học"})),
        ));
    }

    let now = Utc::now().to_rfc3339();

    if let Some(display_name) = &req.display_name {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Tên hiển thị không được để trống"})),
            ));
        }
        sqlx::query("UPDATE subjects SET display_name = ?, updated_at = ? WHERE name = ?")
            .bind(display_name)
            .bind(&now)
            .bind(&name)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(icon) = &req.icon {
        sqlx::query("UPDATE subjects SET icon = ?, updated_at = ? WHERE name = ?")
            .bind(icon)
            .bind(&now)
            .bind(&name)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(color) = &req.color {
        sqlx::query("UPDATE subjects SET color = ?, updated_at = ? WHERE name = ?")
            .bind(color)
            .bind(&now)
            .bind(&name)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(active) = req.active {
        sqlx::query("UPDATE subjects SET active = ?, updated_at = ? WHERE name = ?")
            .bind(active as i32)
            .bind(&now)
            .bind(&name)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    Ok(Json(json!({
        "message": "Cập nhật môn học thành công"
    })))
}
