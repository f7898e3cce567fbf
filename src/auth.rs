use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower_cookies::Cookies;

use crate::state::AppState;
use giasuhub_backend::models::User;

pub const SESSION_COOKIE_NAME: &str = "giasuhub_session";

/// Session lifetime / Thời hạn phiên đăng nhập
const SESSION_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Mint a new session token; the caller persists it / Tạo token phiên mới
pub fn create_session(user_id: &str) -> Session {
    use rand::Rng;
    let id: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    Session {
        id,
        user_id: user_id.to_string(),
        expires_at: Utc::now() + chrono::Duration::days(SESSION_DAYS),
    }
}

/// Look up the account a session token belongs to. Expiry is compared on
/// RFC3339 strings, same format the write path stores / So sánh chuỗi RFC3339
pub async fn user_for_token(state: &AppState, token: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"SELECT u.* FROM users u
           INNER JOIN sessions s ON u.id = s.user_id
           WHERE s.id = ? AND s.expires_at > ? AND u.enabled = 1"#,
    )
    .bind(token)
    .bind(Utc::now().to_rfc3339())
    .fetch_optional(&state.db)
    .await
}

/// Resolve the signed-in user from the session cookie. A missing cookie is
/// not an error; a storage failure is / Thiếu cookie trả về None, lỗi lưu trữ trả về Err
pub async fn session_user(
    state: &AppState,
    cookies: &Cookies,
) -> Result<Option<User>, sqlx::Error> {
    match cookies.get(SESSION_COOKIE_NAME) {
        Some(cookie) => user_for_token(state, cookie.value()).await,
        None => Ok(None),
    }
}

/// Any signed-in account / Bất kỳ tài khoản đã đăng nhập
pub async fn require_login(
    state: &AppState,
    cookies: &Cookies,
) -> Result<User, (StatusCode, Json<Value>)> {
    session_user(state, cookies)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Lỗi máy chủ"})),
            )
        })?
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, Json(json!({"error": "Chưa đăng nhập"}))))
}

/// Admin accounts only / Chỉ quản trị viên
pub async fn require_admin(
    state: &AppState,
    cookies: &Cookies,
) -> Result<User, (StatusCode, Json<Value>)> {
    let user = require_login(state, cookies).await?;
    if !user.is_admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Cần quyền quản trị viên"})),
        ));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn memory_pool() -> SqlitePool {
        // One connection keeps the in-memory database alive and shared
        // / Một kết nối giữ cơ sở dữ liệu trong bộ nhớ
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn seed_user(pool: &SqlitePool, id: &str, username: &str) {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, email, is_admin, enabled, created_at, updated_at)
             VALUES (?, ?, ?, NULL, 0, 1, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind("not-a-real-hash")
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_storage_failure_is_an_error_not_a_missing_user() {
        let pool = memory_pool().await;
        pool.close().await;
        let state = AppState { db: pool };

        let result = user_for_token(&state, "token-nào-đó").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_live_session_resolves_its_user() {
        let pool = memory_pool().await;
        crate::db::run_migrations(&pool).await.unwrap();
        seed_user(&pool, "user-1", "thaygiao").await;

        let session = create_session("user-1");
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO sessions (id, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(session.expires_at.to_rfc3339())
            .bind(&now)
            .execute(&pool)
            .await
            .unwrap();

        let state = AppState { db: pool };
        let found = user_for_token(&state, &session.id).await.unwrap();
        assert_eq!(found.map(|u| u.username), Some("thaygiao".to_string()));
    }

    #[tokio::test]
    async fn test_expired_session_resolves_nobody() {
        let pool = memory_pool().await;
        crate::db::run_migrations(&pool).await.unwrap();
        seed_user(&pool, "user-2", "cogiao").await;

        let now = Utc::now().to_rfc3339();
        let expired_at = (Utc::now() - chrono::Duration::days(1)).to_rfc3339();
        sqlx::query("INSERT INTO sessions (id, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
            .bind("expired-token")
            .bind("user-2")
            .bind(&expired_at)
            .bind(&now)
            .execute(&pool)
            .await
            .unwrap();

        let state = AppState { db: pool };
        let found = user_for_token(&state, "expired-token").await.unwrap();
        assert!(found.is_none());
    }
}
