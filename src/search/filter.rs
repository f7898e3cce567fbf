use serde::{Deserialize, Serialize};

use crate::models::{TimeSlot, Tutor};

/// Transient constraint set for the tutor listing. Every dimension is
/// optional; an empty set matches everything / Bộ lọc cho danh sách gia sư
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub subject: Option<String>,
    pub course_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub time_slots: Vec<TimeSlot>,
    pub keywords: Option<String>,
}

impl SearchFilters {
    /// True when no dimension constrains the listing / Không có điều kiện nào
    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }

    /// Expand the present dimensions into typed clauses. Adding a filter
    /// dimension means adding one arm here / Mỗi chiều lọc là một mệnh đề
    pub fn clauses(&self) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        if let Some(subject) = non_blank(&self.subject) {
            clauses.push(FilterClause::Subject(subject));
        }
        if let Some(course_type) = non_blank(&self.course_type) {
            clauses.push(FilterClause::CourseType(course_type));
        }
        if let Some(min) = self.min_price {
            clauses.push(FilterClause::MinPrice(min));
        }
        if let Some(max) = self.max_price {
            clauses.push(FilterClause::MaxPrice(max));
        }
        if !self.time_slots.is_empty() {
            clauses.push(FilterClause::TimeSlots(self.time_slots.clone()));
        }
        if let Some(keywords) = non_blank(&self.keywords) {
            clauses.push(FilterClause::Keywords(keywords));
        }
        clauses
    }

    /// All present clauses must pass / Mọi mệnh đề đều phải đúng
    pub fn matches(&self, tutor: &Tutor) -> bool {
        self.clauses().iter().all(|clause| clause.evaluate(tutor))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One active filter dimension / Một mệnh đề lọc đang bật
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Exact tag match against the tutor's subject list / Khớp đúng môn dạy
    Subject(String),
    /// Exact tag match against the tutor's course types / Khớp hình thức dạy
    CourseType(String),
    MinPrice(i64),
    MaxPrice(i64),
    /// Any overlap with the tutor's slots is enough / Chỉ cần trùng một khung giờ
    TimeSlots(Vec<TimeSlot>),
    /// Case-insensitive substring over name and subject tags / Tìm gần đúng
    Keywords(String),
}

impl FilterClause {
    pub fn evaluate(&self, tutor: &Tutor) -> bool {
        match self {
            FilterClause::Subject(subject) => tutor.subjects.iter().any(|s| s == subject),
            FilterClause::CourseType(course_type) => {
                tutor.course_types.iter().any(|c| c == course_type)
            }
            FilterClause::MinPrice(min) => tutor.hourly_price >= *min,
            FilterClause::MaxPrice(max) => tutor.hourly_price <= *max,
            FilterClause::TimeSlots(slots) => {
                slots.iter().any(|slot| tutor.time_slots.contains(slot))
            }
            FilterClause::Keywords(keywords) => {
                let needle = keywords.to_lowercase();
                tutor.display_name.to_lowercase().contains(&needle)
                    || tutor
                        .subjects
                        .iter()
                        .any(|s| s.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Keep every matching tutor, preserving storage order. The clause list is
/// built once and shared across the whole collection / Giữ nguyên thứ tự lưu trữ
pub fn filter_tutors(tutors: &[Tutor], filters: &SearchFilters) -> Vec<Tutor> {
    let clauses = filters.clauses();
    tutors
        .iter()
        .filter(|tutor| clauses.iter().all(|clause| clause.evaluate(tutor)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn sample_tutor(name: &str, price: i64, subjects: &[&str], slots: &[TimeSlot]) -> Tutor {
        Tutor {
            id: format!("tutor-{}", name.to_lowercase().replace(' ', "-")),
            owner_id: "user-1".to_string(),
            display_name: name.to_string(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            grade_levels: vec!["THPT".to_string()],
            education: "ĐH Sư phạm Hà Nội".to_string(),
            hourly_price: price,
            rating: Some(4.5),
            review_count: 12,
            status: Availability::Online,
            verified: true,
            top_rated: false,
            badges: Vec::new(),
            time_slots: slots.to_vec(),
            course_types: vec!["online".to_string()],
            description: String::new(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_empty_filters_match_every_tutor() {
        let tutors = vec![
            sample_tutor("Thầy Minh", 120000, &["Toán"], &[TimeSlot::Morning]),
            sample_tutor("Cô Lan", 90000, &["Tiếng Anh"], &[TimeSlot::Evening]),
        ];
        let filters = SearchFilters::default();
        assert!(filters.is_empty());
        for tutor in &tutors {
            assert!(filters.matches(tutor));
        }
        assert_eq!(filter_tutors(&tutors, &filters).len(), tutors.len());
    }

    #[test]
    fn test_price_window_can_pin_an_exact_price() {
        let tutors = vec![
            sample_tutor("A", 99999, &["Toán"], &[]),
            sample_tutor("B", 100000, &["Toán"], &[]),
            sample_tutor("C", 100001, &["Toán"], &[]),
        ];
        let filters = SearchFilters {
            min_price: Some(100000),
            max_price: Some(100000),
            ..Default::default()
        };
        let hits = filter_tutors(&tutors, &filters);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hourly_price, 100000);
    }

    #[test]
    fn test_max_price_keeps_cheaper_tutors_in_original_order() {
        let tutors = vec![
            sample_tutor("A", 80000, &["Toán"], &[]),
            sample_tutor("B", 120000, &["Lý"], &[]),
            sample_tutor("C", 200000, &["Hóa"], &[]),
        ];
        let filters = SearchFilters {
            max_price: Some(150000),
            ..Default::default()
        };
        let hits = filter_tutors(&tutors, &filters);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].display_name, "A");
        assert_eq!(hits[1].display_name, "B");
    }

    #[test]
    fn test_contradictory_price_bounds_yield_nothing() {
        let tutors = vec![sample_tutor("A", 150000, &["Toán"], &[])];
        let filters = SearchFilters {
            min_price: Some(200000),
            max_price: Some(100000),
            ..Default::default()
        };
        assert!(filter_tutors(&tutors, &filters).is_empty());
    }

    #[test]
    fn test_morning_slot_excludes_evening_only_tutor() {
        let morning = sample_tutor("Sáng", 100000, &["Toán"], &[TimeSlot::Morning]);
        let evening = sample_tutor("Tối", 100000, &["Toán"], &[TimeSlot::Evening]);
        let filters = SearchFilters {
            time_slots: vec![TimeSlot::Morning],
            ..Default::default()
        };
        assert!(filters.matches(&morning));
        assert!(!filters.matches(&evening));
    }

    #[test]
    fn test_any_requested_slot_overlap_is_enough() {
        let tutor = sample_tutor("Tối", 100000, &["Toán"], &[TimeSlot::Evening]);
        let filters = SearchFilters {
            time_slots: vec![TimeSlot::Morning, TimeSlot::Evening],
            ..Default::default()
        };
        assert!(filters.matches(&tutor));
    }

    #[test]
    fn test_keywords_and_subject_must_both_hold() {
        let minh = sample_tutor("Thầy Minh", 150000, &["Toán", "Lý"], &[]);
        let lan = sample_tutor("Cô Lan", 150000, &["Toán"], &[]);
        let filters = SearchFilters {
            subject: Some("Toán".to_string()),
            keywords: Some("Minh".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&minh));
        assert!(!filters.matches(&lan));
    }

    #[test]
    fn test_keyword_match_ignores_case() {
        let tutor = sample_tutor("Thầy Minh", 150000, &["Toán"], &[]);
        let filters = SearchFilters {
            keywords: Some("minh".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&tutor));
    }

    #[test]
    fn test_keyword_can_hit_a_subject_tag() {
        let tutor = sample_tutor("Cô Lan", 150000, &["Tiếng Anh"], &[]);
        let filters = SearchFilters {
            keywords: Some("tiếng anh".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&tutor));
    }

    #[test]
    fn test_subject_match_is_exact_not_substring() {
        let tutor = sample_tutor("Thầy Nam", 150000, &["Toán cao cấp"], &[]);
        let filters = SearchFilters {
            subject: Some("Toán".to_string()),
            ..Default::default()
        };
        assert!(!filters.matches(&tutor));
    }

    #[test]
    fn test_course_type_requires_listed_tag() {
        let tutor = sample_tutor("Thầy Nam", 150000, &["Toán"], &[]);
        let online = SearchFilters {
            course_type: Some("online".to_string()),
            ..Default::default()
        };
        let offline = SearchFilters {
            course_type: Some("offline".to_string()),
            ..Default::default()
        };
        assert!(online.matches(&tutor));
        assert!(!offline.matches(&tutor));
    }

    #[test]
    fn test_filter_tutors_agrees_with_matches_per_tutor() {
        let tutors = vec![
            sample_tutor("Thầy Minh", 120000, &["Toán", "Lý"], &[TimeSlot::Morning]),
            sample_tutor("Cô Lan", 90000, &["Tiếng Anh"], &[TimeSlot::Evening]),
            sample_tutor("Thầy Nam", 200000, &["Toán"], &[TimeSlot::Afternoon]),
        ];
        let filters = SearchFilters {
            subject: Some("Toán".to_string()),
            max_price: Some(150000),
            time_slots: vec![TimeSlot::Morning, TimeSlot::Afternoon],
            ..Default::default()
        };
        let hits = filter_tutors(&tutors, &filters);
        for tutor in &tutors {
            let kept = hits.iter().any(|t| t.id == tutor.id);
            assert_eq!(kept, filters.matches(tutor));
        }
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "Thầy Minh");
    }

    #[test]
    fn test_blank_strings_impose_no_constraint() {
        let tutor = sample_tutor("Thầy Nam", 150000, &["Toán"], &[]);
        let filters = SearchFilters {
            subject: Some("  ".to_string()),
            keywords: Some(String::new()),
            ..Default::default()
        };
        assert!(filters.is_empty());
        assert!(filters.matches(&tutor));
    }
}
