//! Read-only view state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::product::ProductRecord;
use crate::query::QueryParameters;
use crate::results::{Pagination, ResultPage};
use crate::table::{ColumnSpec, TableProps};

/// Where the search session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No lookup has been issued yet.
    #[default]
    Idle,
    /// The latest lookup has not resolved.
    Loading,
    /// The latest lookup succeeded.
    Ready,
    /// The latest lookup failed.
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network-level failure detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum NetworkFailure {
    /// No response within the ceiling.
    Timeout(Duration),
    /// Could not reach the server.
    Connect(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The connection broke mid-exchange.
    Transport(String),
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(d) => write!(f, "timeout after {:?}", d),
            Self::Connect(msg) => write!(f, "connection failed: {}", msg),
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// Why the latest lookup failed, as recorded in the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport failure, timeout, or non-success status.
    Network(NetworkFailure),
    /// The payload did not match the expected result shape.
    MalformedResponse(String),
}

impl ErrorKind {
    /// Check if this failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(NetworkFailure::Timeout(_)))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(failure) => write!(f, "network error: {}", failure),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

/// Snapshot of what the display should show.
///
/// `rows`, `total_count` and `error` always come from the latest accepted
/// response or failure, never from a request still in flight. Previous rows
/// stay visible while a newer request loads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub rows: Arc<[ProductRecord]>,
    pub total_count: u64,
    pub loading: bool,
    pub error: Option<ErrorKind>,
    pub status: SessionStatus,
    /// Parameters of the latest issued request.
    pub query: QueryParameters,
    /// A typed term waiting for the input to go quiet.
    pub pending_term: Option<String>,
}

impl ViewState {
    /// Initial view for a session that has not fetched anything.
    pub fn idle(query: QueryParameters) -> Self {
        Self {
            rows: Arc::from(Vec::new()),
            total_count: 0,
            loading: false,
            error: None,
            status: SessionStatus::Idle,
            query,
            pending_term: None,
        }
    }

    /// A new request started for `query`. Content is retained.
    pub fn begin(&mut self, query: QueryParameters) {
        self.query = query;
        self.pending_term = None;
        self.loading = true;
        self.status = SessionStatus::Loading;
    }

    /// The latest request succeeded.
    pub fn accept(&mut self, page: ResultPage) {
        let (rows, total_count) = page.into_parts();
        self.rows = rows.into();
        self.total_count = total_count;
        self.loading = false;
        self.error = None;
        self.status = SessionStatus::Ready;
    }

    /// The latest request failed. Content is retained.
    pub fn fail(&mut self, error: ErrorKind) {
        self.loading = false;
        self.error = Some(error);
        self.status = SessionStatus::Failed;
    }

    /// A term was typed but not applied yet.
    pub fn defer_term(&mut self, term: impl Into<String>) {
        self.pending_term = Some(term.into());
    }

    /// Check if no request is outstanding and no typed term is waiting.
    pub fn is_settled(&self) -> bool {
        !self.loading && self.pending_term.is_none()
    }

    /// Pagination for the current query against the accepted count.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.query.page(), self.query.page_size(), self.total_count)
    }

    /// Props for the table renderer.
    pub fn table_props(&self, columns: Vec<ColumnSpec>) -> TableProps {
        TableProps {
            columns,
            rows: Arc::clone(&self.rows),
            loading: self.loading,
            total_count: self.total_count,
            pagination: self.pagination(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::idle(QueryParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::product_columns;

    fn page(n: usize, total: u64) -> ResultPage {
        let rows = (0..n).map(|i| ProductRecord::named(format!("p{}", i))).collect();
        ResultPage::new(rows, total)
    }

    #[test]
    fn test_idle() {
        let view = ViewState::default();
        assert_eq!(view.status, SessionStatus::Idle);
        assert!(!view.loading);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_begin_retains_content() {
        let mut view = ViewState::default();
        view.accept(page(3, 3));
        view.begin(QueryParameters::default().with_term("milk"));

        assert!(view.loading);
        assert_eq!(view.status, SessionStatus::Loading);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.query.term(), "milk");
    }

    #[test]
    fn test_accept_clears_error() {
        let mut view = ViewState::default();
        view.fail(ErrorKind::Network(NetworkFailure::Status(500)));
        view.accept(page(10, 137));

        assert_eq!(view.error, None);
        assert_eq!(view.total_count, 137);
        assert_eq!(view.status, SessionStatus::Ready);
    }

    #[test]
    fn test_fail_keeps_rows() {
        let mut view = ViewState::default();
        view.accept(page(2, 2));
        view.begin(QueryParameters::default());
        view.fail(ErrorKind::Network(NetworkFailure::Timeout(Duration::from_secs(10))));

        assert!(!view.loading);
        assert_eq!(view.rows.len(), 2);
        assert!(view.error.as_ref().unwrap().is_timeout());
        assert_eq!(view.status, SessionStatus::Failed);
    }

    #[test]
    fn test_deferred_term_is_not_settled() {
        let mut view = ViewState::default();
        assert!(view.is_settled());

        view.defer_term("mil");
        assert!(!view.is_settled());

        view.begin(QueryParameters::default().with_term("milk"));
        assert_eq!(view.pending_term, None);
        view.accept(page(1, 1));
        assert!(view.is_settled());
    }

    #[test]
    fn test_table_props() {
        let mut view = ViewState::default();
        view.accept(page(10, 137));
        let props = view.table_props(product_columns());

        assert_eq!(props.rows.len(), 10);
        assert_eq!(props.total_count, 137);
        assert_eq!(props.pagination.total_pages, 14);
        assert!(!props.loading);
    }

    #[test]
    fn test_error_kind_display() {
        let err = ErrorKind::MalformedResponse("missing results".to_string());
        assert_eq!(err.to_string(), "malformed response: missing results");
    }
}
