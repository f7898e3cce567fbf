use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::auth::{require_admin, require_login};
use crate::state::AppState;
use giasuhub_backend::models::{
    encode_list, Availability, CreateTutorRequest, ModerateTutorRequest, Tutor, TutorRow,
    UpdateStatusRequest, UpdateTutorRequest,
};
use giasuhub_backend::search::query::param;
use giasuhub_backend::search::{decode_filters, filter_tutors, sort_tutors, SortKey};

/// Owner-or-admin guard for the tutor write paths / Chủ hồ sơ hoặc quản trị viên
async fn require_owner_or_admin(
    state: &AppState,
    cookies: &Cookies,
    tutor_id: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    let user = require_login(state, cookies).await?;

    let owner_id: Option<String> = sqlx::query_scalar("SELECT owner_id FROM tutors WHERE id = ?")
        .bind(tutor_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;

    let owner_id = owner_id.ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Không tìm thấy gia sư"})),
    ))?;

    if owner_id != user.id && !user.is_admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Không có quyền sửa hồ sơ này"})),
        ));
    }
    Ok(())
}

/// GET /api/tutors - filtered listing as a bare array, storage order unless a
/// sort key is given / Danh sách gia sư đã lọc
pub async fn list_tutors(
    State(state): State<Arc<AppState>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<Tutor>>, (StatusCode, Json<Value>)> {
    let raw_query = raw_query.unwrap_or_default();
    let filters = decode_filters(&raw_query);

    // rowid keeps insertion order / rowid giữ thứ tự chèn
    let rows = sqlx::query_as::<_, TutorRow>("SELECT * FROM tutors ORDER BY rowid")
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load tutors: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;

    let tutors: Vec<Tutor> = rows.into_iter().map(TutorRow::into_tutor).collect();
    let mut matched = filter_tutors(&tutors, &filters);

    if let Some(key) = param(&raw_query, "sort").and_then(|s| SortKey::parse(&s)) {
        matched = sort_tutors(&matched, key);
    }

    Ok(Json(matched))
}

/// GET /api/tutors/:id
pub async fn get_tutor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Tutor>, (StatusCode, Json<Value>)> {
    let row = sqlx::query_as::<_, TutorRow>("SELECT * FROM tutors WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Không tìm thấy gia sư"})),
        ))?;

    Ok(Json(row.into_tutor()))
}

/// POST /api/tutors - any signed-in account can open a tutor profile
/// / Tài khoản đã đăng nhập đều có thể tạo hồ sơ gia sư
pub async fn create_tutor(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<CreateTutorRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let user = require_login(&state, &cookies).await?;

    let display_name = req.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Tên hiển thị không được để trống"})),
        ));
    }
    if req.subjects.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Cần ít nhất một môn dạy"})),
        ));
    }
    if req.hourly_price <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Giá theo giờ phải là số dương"})),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    // New profiles start offline until the tutor goes live / Hồ sơ mới ở trạng thái offline
    sqlx::query(
        "INSERT INTO tutors (id, owner_id, display_name, subjects, grade_levels, education, hourly_price,
                             rating, review_count, status, verified, top_rated, badges, time_slots,
                             course_types, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, NULL, 0, 'offline', 0, 0, '[]', ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&user.id)
    .bind(&display_name)
    .bind(encode_list(&req.subjects))
    .bind(encode_list(&req.grade_levels))
    .bind(&req.education)
    .bind(req.hourly_price)
    .bind(encode_list(&req.time_slots))
    .bind(encode_list(&req.course_types))
    .bind(&req.description)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create tutor: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Tạo hồ sơ thất bại"})),
        )
    })?;

    Ok(Json(json!({
        "id": id,
        "message": "Tạo hồ sơ gia sư thành công"
    })))
}

/// POST /api/tutors/:id - partial update, only provided fields change
/// / Cập nhật từng phần, chỉ các trường được gửi
pub async fn update_tutor(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(id): Path<String>,
    Json(req): Json<UpdateTutorRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_owner_or_admin(&state, &cookies, &id).await?;

    let now = Utc::now().to_rfc3339();

    if let Some(display_name) = &req.display_name {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Tên hiển thị không được để trống"})),
            ));
        }
        sqlx::query("UPDATE tutors SET display_name = ?, updated_at = ? WHERE id = ?")
            .bind(display_name)
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(subjects) = &req.subjects {
        if subjects.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Cần ít nhất một môn dạy"})),
            ));
        }
        sqlx::query("UPDATE tutors SET subjects = ?, updated_at = ? WHERE id = ?")
            .bind(encode_list(subjects))
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(grade_levels) = &req.grade_levels {
        sqlx::query("UPDATE tutors SET grade_levels = ?, updated_at = ? WHERE id = ?")
            .bind(encode_list(grade_levels))
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(education) = &req.education {
        sqlx::query("UPDATE tutors SET education = ?, updated_at = ? WHERE id = ?")
            .bind(education)
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(hourly_price) = req.hourly_price {
        if hourly_price <= 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Giá theo giờ phải là số dương"})),
            ));
        }
        sqlx::query("UPDATE tutors SET hourly_price = ?, updated_at = ? WHERE id = ?")
            .bind(hourly_price)
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(time_slots) = &req.time_slots {
        sqlx::query("UPDATE tutors SET time_slots = ?, updated_at = ? WHERE id = ?")
            .bind(encode_list(time_slots))
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(course_types) = &req.course_types {
        sqlx::query("UPDATE tutors SET course_types = ?, updated_at = ? WHERE id = ?")
            .bind(encode_list(course_types))
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(description) = &req.description {
        sqlx::query("UPDATE tutors SET description = ?, updated_at = ? WHERE id = ?")
            .bind(description)
            .bind(&now)
            .bind(&id)
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
        "message": "Cập nhật hồ sơ thành công"
    })))
}

/// POST /api/tutors/:id/status - availability toggle instead of deletion
/// / Chuyển trạng thái thay vì xóa hồ sơ
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_owner_or_admin(&state, &cookies, &id).await?;

    let status = Availability::parse(&req.status).ok_or((
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "Trạng thái không hợp lệ"})),
    ))?;

    sqlx::query("UPDATE tutors SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;

    Ok(Json(json!({
        "message": "Cập nhật trạng thái thành công"
    })))
}

/// POST /api/tutors/:id/moderate - curation flags plus the rating import from
/// the review pipeline / Trường kiểm duyệt, chỉ quản trị viên
pub async fn moderate_tutor(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Path(id): Path<String>,
    Json(req): Json<ModerateTutorRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&state, &cookies).await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tutors WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;
    if exists == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Không tìm thấy gia sư"})),
        ));
    }

    let now = Utc::now().to_rfc3339();

    if let Some(verified) = req.verified {
        sqlx::query("UPDATE tutors SET verified = ?, updated_at = ? WHERE id = ?")
            .bind(verified as i32)
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(top_rated) = req.top_rated {
        sqlx::query("UPDATE tutors SET top_rated = ?, updated_at = ? WHERE id = ?")
            .bind(top_rated as i32)
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(badges) = &req.badges {
        sqlx::query("UPDATE tutors SET badges = ?, updated_at = ? WHERE id = ?")
            .bind(encode_list(badges))
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(rating) = req.rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Điểm đánh giá phải trong khoảng 0 đến 5"})),
            ));
        }
        sqlx::query("UPDATE tutors SET rating = ?, updated_at = ? WHERE id = ?")
            .bind(rating)
            .bind(&now)
            .bind(&id)
            .execute(&state.db)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;
    }

    if let Some(review_count) = req.review_count {
        if review_count < 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Số lượt đánh giá không được âm"})),
            ));
        }
        sqlx::query("UPDATE tutors SET review_count = ?, updated_at = ? WHERE id = ?")
            .bind(review_count)
            .bind(&now)
            .bind(&id)
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
        "message": "Cập nhật kiểm duyệt thành công"
    })))
}
