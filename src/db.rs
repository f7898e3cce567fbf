use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Generate random password / Sinh mật khẩu ngẫu nhiên
fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$%^&*";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Run database migrations / Chạy di trú cơ sở dữ liệu
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            email TEXT,
            is_admin INTEGER NOT NULL DEFAULT 0,
            enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // List columns hold JSON arrays as text / Các cột danh sách lưu JSON dạng văn bản
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutors (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            display_name TEXT NOT NULL,
            subjects TEXT NOT NULL DEFAULT '[]',
            grade_levels TEXT NOT NULL DEFAULT '[]',
            education TEXT NOT NULL DEFAULT '',
            hourly_price INTEGER NOT NULL,
            rating REAL,
            review_count INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'offline',
            verified INTEGER NOT NULL DEFAULT 0,
            top_rated INTEGER NOT NULL DEFAULT 0,
            badges TEXT NOT NULL DEFAULT '[]',
            time_slots TEXT NOT NULL DEFAULT '[]',
            course_types TEXT NOT NULL DEFAULT '[]',
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tutors_owner ON tutors(owner_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            name TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            color TEXT NOT NULL DEFAULT '',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Migration: course_types landed after the first release, older databases
    // lack the column / Cột course_types thêm sau bản phát hành đầu
    let has_course_types: bool = sqlx::query_scalar::<_, i32>(
        "SELECT COUNT(*) FROM pragma_table_info('tutors') WHERE name = 'course_types'",
    )
    .fetch_one(pool)
    .await
    .map(|count| count > 0)
    .unwrap_or(false);

    if !has_course_types {
        tracing::info!("Migration: Adding course_types column to tutors");
        sqlx::query("ALTER TABLE tutors ADD COLUMN course_types TEXT NOT NULL DEFAULT '[]'")
            .execute(pool)
            .await?;
    }

    tracing::info!("Database migration completed");

    initialize_default_data(pool).await?;

    Ok(())
}

/// Initialize default data / Khởi tạo dữ liệu mặc định
async fn initialize_default_data(pool: &SqlitePool) -> Result<()> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count == 0 {
        tracing::info!("First startup, initializing default data...");

        let admin_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let admin_password = generate_random_password(16);
        let password_hash = bcrypt::hash(&admin_password, bcrypt::DEFAULT_COST)?;

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, email, is_admin, enabled, created_at, updated_at)
             VALUES (?, ?, ?, ?, 1, 1, ?, ?)",
        )
        .bind(&admin_id)
        .bind("admin")
        .bind(&password_hash)
        .bind("admin@giasuhub.vn")
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        tracing::info!("============================================================");
        tracing::info!("Default admin account created:");
        tracing::info!("  Email: admin@giasuhub.vn");
        tracing::info!("  Username: admin");
        tracing::info!("  Password: {}", admin_password);
        tracing::info!("WARNING: Please save the password and change it after login!");
        tracing::info!("============================================================");
    }

    // Subject catalog; INSERT OR IGNORE keeps restarts idempotent and lets
    // upgrades ship new entries / Danh mục môn học, khởi động lại không trùng
    let subjects = vec![
        ("math", "Toán", "calculator", "blue"),
        ("physics", "Lý", "atom", "purple"),
        ("chemistry", "Hóa", "flask", "green"),
        ("english", "Tiếng Anh", "languages", "red"),
        ("literature", "Văn", "book-open", "amber"),
        ("biology", "Sinh", "leaf", "emerald"),
        ("informatics", "Tin học", "laptop", "cyan"),
        ("ielts", "IELTS", "graduation-cap", "indigo"),
    ];

    let now = Utc::now().to_rfc3339();
    for (name, display_name, icon, color) in subjects {
        sqlx::query(
            "INSERT OR IGNORE INTO subjects (name, display_name, icon, color, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(name)
        .bind(display_name)
        .bind(icon)
        .bind(color)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    Ok(())
}
