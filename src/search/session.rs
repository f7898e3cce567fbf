use crate::models::Tutor;
use crate::search::filter::SearchFilters;
use crate::search::query::encode_filters;

/// Shown when a search loads cleanly but matches nothing / Thông báo không có kết quả
pub const NO_RESULTS_MESSAGE: &str = "Không tìm thấy gia sư phù hợp, hãy thử điều chỉnh bộ lọc";

/// Lifecycle of one search interaction / Vòng đời một lượt tìm kiếm
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

impl Default for SearchPhase {
    fn default() -> Self {
        SearchPhase::Idle
    }
}

/// Handle for one issued fetch / Vé cho một lượt tải
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    /// Monotonic; only the newest id may publish its response / Tăng đơn điệu
    pub request_id: u64,
    /// Encoded query string for the listing call / Query string đã mã hóa
    pub query: String,
}

/// What a finished fetch produced / Kết quả của lượt tải
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Results(Vec<Tutor>),
    Failed(String),
}

/// Owns the active filter selection and the visible results. Filter changes
/// replace the set wholesale and issue a new ticket; a response is applied
/// only if it belongs to the newest ticket, so a slow stale fetch cannot
/// overwrite a fresh one / Trạng thái phiên tìm kiếm
#[derive(Debug, Default)]
pub struct SearchSession {
    filters: SearchFilters,
    phase: SearchPhase,
    results: Vec<Tutor>,
    last_issued: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn results(&self) -> &[Tutor] {
        &self.results
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Replace the whole filter set and start a new fetch / Thay bộ lọc, tải lại
    pub fn set_filters(&mut self, filters: SearchFilters) -> SearchTicket {
        self.filters = filters;
        self.issue()
    }

    /// Back to the unfiltered listing; nothing from the previous selection
    /// survives / Xóa toàn bộ bộ lọc
    pub fn clear(&mut self) -> SearchTicket {
        self.filters = SearchFilters::default();
        self.issue()
    }

    fn issue(&mut self) -> SearchTicket {
        self.last_issued += 1;
        self.phase = SearchPhase::Loading;
        SearchTicket {
            request_id: self.last_issued,
            query: encode_filters(&self.filters),
        }
    }

    /// Publish a finished fetch. In-flight work is never aborted; anything
    /// but the newest ticket is simply ignored here / Bỏ qua kết quả cũ
    pub fn complete(&mut self, request_id: u64, outcome: SearchOutcome) {
        if request_id != self.last_issued {
            tracing::debug!(
                "Stale search response {} discarded, newest is {}",
                request_id,
                self.last_issued
            );
            return;
        }
        match outcome {
            SearchOutcome::Results(tutors) => {
                self.results = tutors;
                self.phase = SearchPhase::Loaded;
            }
            SearchOutcome::Failed(message) => {
                self.phase = SearchPhase::Error(message);
            }
        }
    }

    /// Distinct messaging for the loaded-but-empty state / Chỉ khi đã tải xong mà rỗng
    pub fn empty_message(&self) -> Option<&'static str> {
        if matches!(self.phase, SearchPhase::Loaded) && self.results.is_empty() {
            Some(NO_RESULTS_MESSAGE)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn sample_tutor(name: &str) -> Tutor {
        Tutor {
            id: format!("tutor-{}", name.to_lowercase()),
            owner_id: "user-1".to_string(),
            display_name: name.to_string(),
            subjects: vec!["Toán".to_string()],
            grade_levels: Vec::new(),
            education: String::new(),
            hourly_price: 100000,
            rating: None,
            review_count: 0,
            status: Availability::Online,
            verified: false,
            top_rated: false,
            badges: Vec::new(),
            time_slots: Vec::new(),
            course_types: Vec::new(),
            description: String::new(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_filter_changes_issue_monotonic_tickets() {
        let mut session = SearchSession::new();
        assert_eq!(*session.phase(), SearchPhase::Idle);

        let first = session.set_filters(SearchFilters {
            subject: Some("Toán".to_string()),
            ..Default::default()
        });
        let second = session.set_filters(SearchFilters {
            subject: Some("Lý".to_string()),
            ..Default::default()
        });
        assert!(second.request_id > first.request_id);
        assert_eq!(second.query, "subject=L%C3%BD");
        assert_eq!(*session.phase(), SearchPhase::Loading);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = SearchSession::new();
        let stale = session.set_filters(SearchFilters {
            keywords: Some("toán".to_string()),
            ..Default::default()
        });
        let fresh = session.set_filters(SearchFilters::default());

        session.complete(
            stale.request_id,
            SearchOutcome::Results(vec![sample_tutor("Cũ")]),
        );
        assert_eq!(*session.phase(), SearchPhase::Loading);
        assert_eq!(session.result_count(), 0);

        session.complete(
            fresh.request_id,
            SearchOutcome::Results(vec![sample_tutor("Mới"), sample_tutor("Khác")]),
        );
        assert_eq!(*session.phase(), SearchPhase::Loaded);
        assert_eq!(session.result_count(), 2);
        assert_eq!(session.results()[0].display_name, "Mới");
    }

    #[test]
    fn test_failure_surfaces_as_error_phase() {
        let mut session = SearchSession::new();
        let ticket = session.set_filters(SearchFilters::default());
        session.complete(
            ticket.request_id,
            SearchOutcome::Failed("Không kết nối được máy chủ".to_string()),
        );
        assert_eq!(
            *session.phase(),
            SearchPhase::Error("Không kết nối được máy chủ".to_string())
        );
        assert_eq!(session.empty_message(), None);
    }

    #[test]
    fn test_clear_drops_every_previous_dimension() {
        let mut session = SearchSession::new();
        session.set_filters(SearchFilters {
            subject: Some("Toán".to_string()),
            course_type: Some("online".to_string()),
            min_price: Some(50000),
            max_price: Some(150000),
            time_slots: vec![crate::models::TimeSlot::Morning],
            keywords: Some("Minh".to_string()),
        });

        let ticket = session.clear();
        assert!(session.filters().is_empty());
        assert_eq!(ticket.query, "");

        session.complete(
            ticket.request_id,
            SearchOutcome::Results(vec![sample_tutor("A"), sample_tutor("B")]),
        );
        assert_eq!(session.result_count(), 2);
    }

    #[test]
    fn test_loaded_empty_result_gets_distinct_messaging() {
        let mut session = SearchSession::new();
        let ticket = session.set_filters(SearchFilters {
            min_price: Some(9_000_000),
            ..Default::default()
        });
        assert_eq!(session.empty_message(), None);

        session.complete(ticket.request_id, SearchOutcome::Results(Vec::new()));
        assert_eq!(*session.phase(), SearchPhase::Loaded);
        assert_eq!(session.empty_message(), Some(NO_RESULTS_MESSAGE));
    }
}
