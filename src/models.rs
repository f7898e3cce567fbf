use serde::{Deserialize, Serialize};

/// Coarse availability tag used by tutors and the search filters.
/// Not a calendar event / Khung giờ dạy, không phải lịch hẹn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(TimeSlot::Morning),
            "afternoon" => Some(TimeSlot::Afternoon),
            "evening" => Some(TimeSlot::Evening),
            _ => None,
        }
    }
}

/// Tutor availability status / Trạng thái hoạt động của gia sư
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Online,
    Offline,
    Busy,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Online => "online",
            Availability::Offline => "offline",
            Availability::Busy => "busy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Availability::Online),
            "offline" => Some(Availability::Offline),
            "busy" => Some(Availability::Busy),
            _ => None,
        }
    }
}

/// Tutor profile as served to the frontend / Hồ sơ gia sư trả về cho frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutor {
    pub id: String,
    pub owner_id: String,
    pub display_name: String,
    /// Free string tags, match Subject display names by convention / Môn dạy
    pub subjects: Vec<String>,
    pub grade_levels: Vec<String>,
    pub education: String,
    /// Hourly price in VND, smallest unit / Giá theo giờ (VND)
    pub hourly_price: i64,
    /// None until the first review lands / Chưa có đánh giá thì để trống
    pub rating: Option<f64>,
    pub review_count: i64,
    pub status: Availability,
    pub verified: bool,
    pub top_rated: bool,
    pub badges: Vec<String>,
    pub time_slots: Vec<TimeSlot>,
    pub course_types: Vec<String>,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Raw row from the tutors table; list columns are JSON text / Hàng thô từ bảng tutors
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TutorRow {
    pub id: String,
    pub owner_id: String,
    pub display_name: String,
    pub subjects: String,
    pub grade_levels: String,
    pub education: String,
    pub hourly_price: i64,
    pub rating: Option<f64>,
    pub review_count: i64,
    pub status: String,
    pub verified: bool,
    pub top_rated: bool,
    pub badges: String,
    pub time_slots: String,
    pub course_types: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TutorRow {
    /// Decode the JSON list columns, tolerating malformed rows / Giải mã các cột JSON
    pub fn into_tutor(self) -> Tutor {
        Tutor {
            id: self.id,
            owner_id: self.owner_id,
            display_name: self.display_name,
            subjects: decode_list(&self.subjects),
            grade_levels: decode_list(&self.grade_levels),
            education: self.education,
            hourly_price: self.hourly_price,
            rating: self.rating,
            review_count: self.review_count,
            status: Availability::parse(&self.status).unwrap_or(Availability::Offline),
            verified: self.verified,
            top_rated: self.top_rated,
            badges: decode_list(&self.badges),
            time_slots: decode_list(&self.time_slots),
            course_types: decode_list(&self.course_types),
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Encode a list value for a JSON text column / Mã hóa danh sách thành cột JSON
pub fn encode_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn decode_list<T: serde::de::DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Subject catalog entry, static reference data / Danh mục môn học
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subject {
    /// English key, stable identifier / Khóa tiếng Anh
    pub name: String,
    /// Localized label shown in the UI / Tên hiển thị
    pub display_name: String,
    pub icon: String,
    pub color: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTutorRequest {
    pub display_name: String,
    pub subjects: Vec<String>,
    #[serde(default)]
    pub grade_levels: Vec<String>,
    #[serde(default)]
    pub education: String,
    pub hourly_price: i64,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub course_types: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateTutorRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(default)]
    pub grade_levels: Option<Vec<String>>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub hourly_price: Option<i64>,
    #[serde(default)]
    pub time_slots: Option<Vec<TimeSlot>>,
    #[serde(default)]
    pub course_types: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Admin-only curation fields; rating/review_count are back-office imports
/// from the review pipeline / Trường kiểm duyệt, chỉ dành cho quản trị viên
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModerateTutorRequest {
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub top_rated: Option<bool>,
    #[serde(default)]
    pub badges: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateSubjectRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}
