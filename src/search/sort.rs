use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Tutor;

/// Result ordering criterion / Tiêu chí sắp xếp kết quả
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Placeholder, keeps the incoming order / Giữ nguyên thứ tự
    Relevance,
    PriceLow,
    Rating,
    Newest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceLow => "price-low",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "relevance" => Some(SortKey::Relevance),
            "price-low" => Some(SortKey::PriceLow),
            "rating" => Some(SortKey::Rating),
            "newest" => Some(SortKey::Newest),
            _ => None,
        }
    }
}

/// Return an ordered copy; the input is never touched. `sort_by` on a Vec is
/// stable, so equal keys keep their incoming order / Trả về bản sao đã sắp xếp
pub fn sort_tutors(tutors: &[Tutor], key: SortKey) -> Vec<Tutor> {
    let mut sorted = tutors.to_vec();
    match key {
        SortKey::Relevance => {}
        SortKey::PriceLow => {
            sorted.sort_by(|a, b| a.hourly_price.cmp(&b.hourly_price));
        }
        SortKey::Rating => {
            // Unrated tutors go last / Gia sư chưa có đánh giá xếp cuối
            sorted.sort_by(|a, b| match (a.rating, b.rating) {
                (Some(a_rating), Some(b_rating)) => {
                    b_rating.partial_cmp(&a_rating).unwrap_or(Ordering::Equal)
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
        SortKey::Newest => {
            // RFC3339 strings order lexicographically / Chuỗi RFC3339 so sánh theo từ điển
            sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn sample_tutor(name: &str, price: i64, rating: Option<f64>, created_at: &str) -> Tutor {
        Tutor {
            id: format!("tutor-{}", name.to_lowercase()),
            owner_id: "user-1".to_string(),
            display_name: name.to_string(),
            subjects: vec!["Toán".to_string()],
            grade_levels: Vec::new(),
            education: String::new(),
            hourly_price: price,
            rating,
            review_count: 0,
            status: Availability::Online,
            verified: false,
            top_rated: false,
            badges: Vec::new(),
            time_slots: Vec::new(),
            course_types: Vec::new(),
            description: String::new(),
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    fn names(tutors: &[Tutor]) -> Vec<String> {
        tutors.iter().map(|t| t.display_name.clone()).collect()
    }

    #[test]
    fn test_price_low_is_non_decreasing_and_a_permutation() {
        let tutors = vec![
            sample_tutor("A", 200000, None, "2024-01-01T00:00:00Z"),
            sample_tutor("B", 80000, None, "2024-01-02T00:00:00Z"),
            sample_tutor("C", 120000, None, "2024-01-03T00:00:00Z"),
        ];
        let sorted = sort_tutors(&tutors, SortKey::PriceLow);
        assert_eq!(sorted.len(), tutors.len());
        for pair in sorted.windows(2) {
            assert!(pair[0].hourly_price <= pair[1].hourly_price);
        }
        let mut expected = names(&tutors);
        expected.sort();
        let mut actual = names(&sorted);
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_price_low_keeps_original_order_for_equal_prices() {
        let tutors = vec![
            sample_tutor("A", 100000, None, "2024-01-01T00:00:00Z"),
            sample_tutor("B", 100000, None, "2024-01-02T00:00:00Z"),
            sample_tutor("C", 80000, None, "2024-01-03T00:00:00Z"),
        ];
        let sorted = sort_tutors(&tutors, SortKey::PriceLow);
        assert_eq!(names(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sorting_leaves_the_input_untouched() {
        let tutors = vec![
            sample_tutor("A", 200000, None, "2024-01-01T00:00:00Z"),
            sample_tutor("B", 80000, None, "2024-01-02T00:00:00Z"),
        ];
        let before = names(&tutors);
        let _ = sort_tutors(&tutors, SortKey::PriceLow);
        assert_eq!(names(&tutors), before);
    }

    #[test]
    fn test_rating_sorts_descending_with_unrated_last() {
        let tutors = vec![
            sample_tutor("A", 100000, Some(4.2), "2024-01-01T00:00:00Z"),
            sample_tutor("B", 100000, None, "2024-01-02T00:00:00Z"),
            sample_tutor("C", 100000, Some(4.9), "2024-01-03T00:00:00Z"),
        ];
        let sorted = sort_tutors(&tutors, SortKey::Rating);
        assert_eq!(names(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_newest_prefers_recent_creation_times() {
        let tutors = vec![
            sample_tutor("A", 100000, None, "2024-01-01T00:00:00Z"),
            sample_tutor("B", 100000, None, "2024-03-01T00:00:00Z"),
            sample_tutor("C", 100000, None, "2024-02-01T00:00:00Z"),
        ];
        let sorted = sort_tutors(&tutors, SortKey::Newest);
        assert_eq!(names(&sorted), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_relevance_is_a_pass_through() {
        let tutors = vec![
            sample_tutor("A", 200000, Some(3.0), "2024-01-01T00:00:00Z"),
            sample_tutor("B", 80000, Some(5.0), "2024-01-02T00:00:00Z"),
        ];
        let sorted = sort_tutors(&tutors, SortKey::Relevance);
        assert_eq!(names(&sorted), names(&tutors));
    }

    #[test]
    fn test_sort_key_tokens_round_trip() {
        for key in [
            SortKey::Relevance,
            SortKey::PriceLow,
            SortKey::Rating,
            SortKey::Newest,
        ] {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::parse("cheapest"), None);
    }
}
