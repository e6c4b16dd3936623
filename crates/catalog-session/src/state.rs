//! Reconciliation state machine.
//!
//! `SessionState` holds the current parameters, the token of the outstanding
//! fetch and the view. It performs no I/O: the actor in `session` decides
//! when to call `begin` and feeds completions to `reconcile`.

use catalog_core::{ErrorKind, QueryParameters, ResultPage, ViewState};

use crate::token::{RequestToken, TokenMint};

/// Outcome of feeding a completion into the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// The completion was current and the view now shows its rows.
    Accepted { total_count: u64, rows: usize },
    /// The completion was current and the view now records the failure.
    Failed(ErrorKind),
    /// The completion was superseded. Nothing changed.
    Discarded,
}

impl Reconciliation {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}

/// Parameters, token bookkeeping and view for one session.
#[derive(Debug)]
pub struct SessionState {
    params: QueryParameters,
    mint: TokenMint,
    outstanding: Option<RequestToken>,
    view: ViewState,
}

impl SessionState {
    /// Fresh state: nothing issued, view idle.
    pub fn new(params: QueryParameters) -> Self {
        Self {
            view: ViewState::idle(params.clone()),
            params,
            mint: TokenMint::new(),
            outstanding: None,
        }
    }

    /// Replace the parameters and start a new request for them.
    ///
    /// Any outstanding request is superseded. The view goes to loading but
    /// keeps its rows, count and error until the new request resolves.
    pub fn begin(&mut self, params: QueryParameters) -> RequestToken {
        let token = self.mint.mint();
        self.view.begin(params.clone());
        self.params = params;
        self.outstanding = Some(token);
        token
    }

    /// Apply the result of the request identified by `token`.
    ///
    /// Only the outstanding token may change the view. Anything older, or a
    /// second completion for a token already reconciled, is discarded.
    pub fn reconcile(
        &mut self,
        token: RequestToken,
        result: Result<ResultPage, ErrorKind>,
    ) -> Reconciliation {
        if self.outstanding != Some(token) {
            return Reconciliation::Discarded;
        }
        self.outstanding = None;

        match result {
            Ok(page) => {
                let total_count = page.total_count();
                let rows = page.len();
                self.view.accept(page);
                Reconciliation::Accepted { total_count, rows }
            }
            Err(error) => {
                self.view.fail(error.clone());
                Reconciliation::Failed(error)
            }
        }
    }

    /// Record a typed term that has not been applied yet.
    pub fn defer_term(&mut self, term: impl Into<String>) {
        self.view.defer_term(term);
    }

    /// Parameters of the latest issued request.
    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    /// Token of the request the view is waiting for.
    pub fn outstanding(&self) -> Option<RequestToken> {
        self.outstanding
    }

    /// Check if `token` is the request the view is waiting for.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.outstanding == Some(token)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use catalog_core::{NetworkFailure, ProductRecord, SessionStatus};

    use super::*;

    fn page(prefix: &str, n: usize, total: u64) -> ResultPage {
        let rows = (0..n)
            .map(|i| ProductRecord::named(format!("{}{}", prefix, i)))
            .collect();
        ResultPage::new(rows, total)
    }

    fn state() -> SessionState {
        SessionState::new(QueryParameters::default())
    }

    // === Begin ===

    #[test]
    fn test_begin_marks_loading() {
        let mut state = state();
        assert_eq!(state.view().status, SessionStatus::Idle);

        let params = state.params().with_term("milk");
        let token = state.begin(params);

        assert!(state.view().loading);
        assert_eq!(state.view().status, SessionStatus::Loading);
        assert_eq!(state.view().query.term(), "milk");
        assert_eq!(state.params().term(), "milk");
        assert!(state.is_current(token));
    }

    #[test]
    fn test_tokens_increase_per_begin() {
        let mut state = state();
        let a = state.begin(QueryParameters::default());
        let b = state.begin(QueryParameters::default());
        assert!(b > a);
        assert_eq!(state.outstanding(), Some(b));
    }

    // === Reconcile ===

    #[test]
    fn test_accept_current() {
        let mut state = state();
        let token = state.begin(QueryParameters::default());

        let outcome = state.reconcile(token, Ok(page("p", 10, 137)));

        assert_eq!(outcome, Reconciliation::Accepted { total_count: 137, rows: 10 });
        assert!(!state.view().loading);
        assert_eq!(state.view().rows.len(), 10);
        assert_eq!(state.view().total_count, 137);
        assert_eq!(state.outstanding(), None);
    }

    #[test]
    fn test_failure_keeps_rows() {
        let mut state = state();
        let first = state.begin(QueryParameters::default());
        state.reconcile(first, Ok(page("p", 10, 137)));

        let second = state.begin(state.params().with_page(2).unwrap());
        let timeout = ErrorKind::Network(NetworkFailure::Timeout(Duration::from_secs(10)));
        let outcome = state.reconcile(second, Err(timeout.clone()));

        assert_eq!(outcome, Reconciliation::Failed(timeout.clone()));
        assert_eq!(state.view().error, Some(timeout));
        assert_eq!(state.view().rows[0].name, "p0");
        assert_eq!(state.view().total_count, 137);
        assert_eq!(state.view().status, SessionStatus::Failed);
    }

    #[test]
    fn test_out_of_order_completion_is_discarded() {
        let mut state = state();
        let a = state.begin(QueryParameters::default().with_term("a"));
        let b = state.begin(QueryParameters::default().with_term("b"));

        state.reconcile(b, Ok(page("b", 3, 3)));
        let after_b = state.view().clone();

        assert!(state.reconcile(a, Ok(page("a", 7, 7))).is_discarded());
        assert_eq!(state.view(), &after_b);
    }

    #[test]
    fn test_stale_completion_while_loading() {
        let mut state = state();
        let a = state.begin(QueryParameters::default().with_term("a"));
        let _b = state.begin(QueryParameters::default().with_term("b"));

        assert!(state.reconcile(a, Ok(page("a", 2, 2))).is_discarded());
        assert!(state.view().loading);
        assert!(state.view().rows.is_empty());
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut state = state();
        let a = state.begin(QueryParameters::default());
        let b = state.begin(QueryParameters::default().with_term("x"));
        state.reconcile(b, Ok(page("x", 1, 1)));

        let outcome = state.reconcile(a, Err(ErrorKind::MalformedResponse("bad".into())));
        assert!(outcome.is_discarded());
        assert_eq!(state.view().error, None);
    }

    #[test]
    fn test_duplicate_completion_is_discarded() {
        let mut state = state();
        let token = state.begin(QueryParameters::default());
        state.reconcile(token, Ok(page("p", 1, 1)));

        assert!(state.reconcile(token, Ok(page("q", 5, 5))).is_discarded());
        assert_eq!(state.view().rows[0].name, "p0");
    }

    #[test]
    fn test_deferred_term() {
        let mut state = state();
        state.defer_term("mil");
        assert_eq!(state.view().pending_term.as_deref(), Some("mil"));
        assert!(!state.view().is_settled());

        state.begin(state.params().with_term("milk"));
        assert_eq!(state.view().pending_term, None);
    }
}
