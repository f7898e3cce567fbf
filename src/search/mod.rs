//! Search module - only provides search capabilities (primitives), does not control flow / Mô-đun tìm kiếm
//!
//! Architecture principles / Nguyên tắc kiến trúc:
//! - Search module only exposes primitive operations: match, filter, encode, decode, sort
//! - Handlers control data loading, response shaping, error reporting
//! - Call direction: API → Search (unidirectional) / Hướng gọi một chiều
//!
//! Pieces / Các phần:
//! - filter: predicate evaluation over tutor profiles, AND across criteria
//! - query: URL query-string codec for filter state, shareable links
//! - sort: result ordering, stable within equal keys
//! - session: client-side search lifecycle, stale response handling

pub mod filter;
pub mod query;
pub mod session;
pub mod sort;

pub use filter::{filter_tutors, FilterClause, SearchFilters};
pub use query::{decode_filters, encode_filters};
pub use session::{SearchOutcome, SearchPhase, SearchSession, SearchTicket};
pub use sort::{sort_tutors, SortKey};
