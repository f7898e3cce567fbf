use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::auth::{create_session, require_login, SESSION_COOKIE_NAME};
use crate::state::AppState;
use giasuhub_backend::models::{LoginRequest, RegisterRequest, User, UserInfo};

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let username = req.username.trim().to_string();
    if username.len() < 3 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Tên đăng nhập cần ít nhất 3 ký tự"})),
        ));
    }
    if username.len() > 20 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Tên đăng nhập tối đa 20 ký tự"})),
        ));
    }
    if req.password.len() < 6 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Mật khẩu cần ít nhất 6 ký tự"})),
        ));
    }

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(&username)
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
            Json(json!({"error": "Tên đăng nhập đã tồn tại"})),
        ));
    }

    if let Some(email) = &req.email {
        let existing_email: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&state.db)
                .await
                .map_err(|_| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"error": "Lỗi máy chủ"})),
                    )
                })?;
        if existing_email.is_some() {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({"error": "Email đã được đăng ký"})),
            ));
        }
    }

    let user_id = Uuid::new_v4().to_string();
    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST).map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Lỗi máy chủ"})),
        )
    })?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, email, is_admin, enabled, created_at, updated_at)
         VALUES (?, ?, ?, ?, 0, 1, ?, ?)",
    )
    .bind(&user_id)
    .bind(&username)
    .bind(&password_hash)
    .bind(&req.email)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create user: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Đăng ký thất bại"})),
        )
    })?;

    Ok(Json(json!({
        "user_id": user_id,
        "message": "Đăng ký thành công"
    })))
}

/// POST /api/auth/login - username or email both sign in
/// / Đăng nhập bằng tên hoặc email
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE (username = ? OR email = ?) AND enabled = 1",
    )
    .bind(&req.username)
    .bind(&req.username)
    .fetch_optional(&state.db)
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Lỗi máy chủ"})),
        )
    })?
    .ok_or((
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Tài khoản hoặc mật khẩu không đúng"})),
    ))?;

    let valid = bcrypt::verify(&req.password, &user.password_hash).map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Lỗi máy chủ"})),
        )
    })?;
    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Tài khoản hoặc mật khẩu không đúng"})),
        ));
    }

    let session = create_session(&user.id);
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO sessions (id, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(session.expires_at.to_rfc3339())
        .bind(&now)
        .execute(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?;

    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, session.id);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    Ok(Json(json!({
        "user": UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<Value>, StatusCode> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE_NAME) {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(cookie.value())
            .execute(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    }

    // Must carry the same path for removal to take / Phải trùng path mới xóa được cookie
    let mut removal_cookie = Cookie::new(SESSION_COOKIE_NAME, "");
    removal_cookie.set_path("/");
    cookies.remove(removal_cookie);

    Ok(Json(json!({"message": "Đã đăng xuất"})))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let user = require_login(&state, &cookies).await?;

    Ok(Json(json!({
        "user": UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    })))
}
