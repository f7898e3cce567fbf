//! Query-string codec for the search filters. One active clause becomes one
//! key=value pair, so a filter state is a shareable URL / Mã hóa bộ lọc thành query string

use crate::models::TimeSlot;
use crate::search::filter::{FilterClause, SearchFilters};

/// Serialize the active clauses, omitting absent dimensions / Bỏ qua chiều không dùng
pub fn encode_filters(filters: &SearchFilters) -> String {
    let mut pairs = Vec::new();
    for clause in filters.clauses() {
        match clause {
            FilterClause::Subject(value) => {
                pairs.push(format!("subject={}", urlencoding::encode(&value)));
            }
            FilterClause::CourseType(value) => {
                pairs.push(format!("courseType={}", urlencoding::encode(&value)));
            }
            FilterClause::MinPrice(value) => pairs.push(format!("minPrice={}", value)),
            FilterClause::MaxPrice(value) => pairs.push(format!("maxPrice={}", value)),
            FilterClause::TimeSlots(slots) => {
                // Slot names are fixed ASCII tokens, safe to join raw / Tên khung giờ là ASCII
                let joined = slots
                    .iter()
                    .map(|slot| slot.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                pairs.push(format!("timeSlots={}", joined));
            }
            FilterClause::Keywords(value) => {
                pairs.push(format!("keywords={}", urlencoding::encode(&value)));
            }
        }
    }
    pairs.join("&")
}

/// Lenient parse: unknown keys, empty values and malformed numbers are
/// dropped rather than rejected / Phân tích khoan dung, bỏ qua giá trị hỏng
pub fn decode_filters(query: &str) -> SearchFilters {
    let mut filters = SearchFilters::default();
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        // Browsers form-encode spaces as '+' / Trình duyệt mã hóa dấu cách thành '+'
        let raw_value = raw_value.replace('+', " ");
        let key = match urlencoding::decode(raw_key) {
            Ok(key) => key.into_owned(),
            Err(_) => continue,
        };
        let value = match urlencoding::decode(&raw_value) {
            Ok(value) => value.into_owned(),
            Err(_) => continue,
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "subject" => filters.subject = Some(value.to_string()),
            "courseType" => filters.course_type = Some(value.to_string()),
            "minPrice" => {
                if let Ok(price) = value.parse::<i64>() {
                    filters.min_price = Some(price);
                }
            }
            "maxPrice" => {
                if let Ok(price) = value.parse::<i64>() {
                    filters.max_price = Some(price);
                }
            }
            "timeSlots" => {
                filters.time_slots = value
                    .split(',')
                    .filter_map(|slot| TimeSlot::parse(slot.trim()))
                    .collect();
            }
            "keywords" => filters.keywords = Some(value.to_string()),
            _ => {}
        }
    }
    filters
}

/// Pull one decoded value out of a raw query string / Lấy một giá trị theo khóa
pub fn param(query: &str, key: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&') {
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let decoded_key = match urlencoding::decode(raw_key) {
            Ok(k) => k.into_owned(),
            Err(_) => continue,
        };
        if decoded_key != key {
            continue;
        }
        let raw_value = raw_value.replace('+', " ");
        if let Ok(value) = urlencoding::decode(&raw_value) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
