//! The search session actor and its handle.
//!
//! One task owns the `SessionState`. It takes changes from handles, fetch
//! completions from spawned fetch tasks, and debounced terms from its
//! `Debouncer`, one at a time, so parameters and view need no locks.

use std::sync::Arc;

use catalog_core::{
    validate_page, validate_page_size, ErrorKind, QueryParameters, ResultPage, ViewState,
};
use catalog_fetch::{FetchError, ResultsFetcher, TimeoutFetcher};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, trace, warn};

use crate::config::SessionConfig;
use crate::debounce::Debouncer;
use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::state::{Reconciliation, SessionState};
use crate::token::RequestToken;

const COMMAND_BUFFER: usize = 32;

/// A parameter change requested through a handle.
#[derive(Debug)]
enum Change {
    Term(String),
    SubmitTerm(String),
    Page(u32),
    PageSize(u32),
    Retry,
}

#[derive(Debug)]
struct Command {
    change: Change,
    ack: oneshot::Sender<Result<(), SessionError>>,
}

#[derive(Debug)]
struct Completion {
    token: RequestToken,
    result: Result<ResultPage, FetchError>,
}

#[derive(Debug)]
struct InFlight {
    token: RequestToken,
    task: AbortHandle,
}

/// Turns parameter changes into fetches and keeps the view consistent with
/// the latest one.
///
/// Build with `new`, then drive with `run` or `spawn`. The session stops
/// once every `SessionHandle` has been dropped.
pub struct SearchSession<F> {
    fetcher: Arc<TimeoutFetcher<F>>,
    config: SessionConfig,
    state: SessionState,
    debounce: Debouncer<String>,
    in_flight: Option<InFlight>,
    startup: Option<RequestToken>,
    commands: mpsc::Receiver<Command>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    view: watch::Sender<ViewState>,
    events: broadcast::Sender<SessionEvent>,
}

impl<F: ResultsFetcher + 'static> SearchSession<F> {
    /// Create a session and the first handle to it.
    ///
    /// With `fetch_on_start` the initial lookup is already begun, so the
    /// first snapshot is loading. Its fetch starts when the session runs.
    pub fn new(fetcher: F, config: SessionConfig) -> Result<(Self, SessionHandle), SessionError> {
        config.validate()?;
        let params = QueryParameters::new(config.default_page_size)?;

        let mut state = SessionState::new(params.clone());
        let startup = config.fetch_on_start.then(|| state.begin(params));

        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(state.view().clone());
        let (events, _) = broadcast::channel(config.event_capacity);

        let handle = SessionHandle {
            commands: commands_tx,
            view: view_rx,
            events: events.clone(),
            max_page_size: config.max_page_size,
        };

        let session = Self {
            fetcher: Arc::new(TimeoutFetcher::new(fetcher, config.fetch_timeout)),
            debounce: Debouncer::new(config.debounce),
            config,
            state,
            in_flight: None,
            startup,
            commands,
            completions_tx,
            completions,
            view,
            events,
        };

        Ok((session, handle))
    }

    /// Create a session and run it on the current tokio runtime.
    pub fn start(fetcher: F, config: SessionConfig) -> Result<SessionHandle, SessionError> {
        let (session, handle) = Self::new(fetcher, config)?;
        session.spawn();
        Ok(handle)
    }

    /// Run the session on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process changes and completions until every handle is dropped.
    pub async fn run(mut self) {
        if let Some(token) = self.startup.take() {
            self.launch(token);
        }

        loop {
            tokio::select! {
                biased;

                Some(completion) = self.completions.recv() => self.on_completion(completion),
                command = self.commands.recv() => match command {
                    Some(Command { change, ack }) => {
                        let result = self.on_change(change);
                        let _ = ack.send(result);
                    }
                    None => break,
                },
                term = self.debounce.fired() => {
                    debug!(term = %term, "debounced term applied");
                    let params = self.state.params().with_term(term);
                    self.issue(params);
                }
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
        debug!("search session stopped");
    }

    fn on_change(&mut self, change: Change) -> Result<(), SessionError> {
        match change {
            Change::Term(term) => {
                trace!(term = %term, "term deferred");
                self.state.defer_term(term.clone());
                self.debounce.schedule(term.clone());
                self.emit(SessionEvent::TermDeferred { term });
                self.publish();
            }
            Change::SubmitTerm(term) => {
                let params = self.state.params().with_term(term);
                self.issue(params);
            }
            Change::Page(page) => {
                let params = self.base_params().with_page(page)?;
                self.issue(params);
            }
            Change::PageSize(size) => {
                let params = self
                    .base_params()
                    .with_page_size_limit(size, self.config.max_page_size)?;
                self.issue(params);
            }
            Change::Retry => {
                let params = self.base_params();
                self.issue(params);
            }
        }
        Ok(())
    }

    /// Current parameters with any waiting term folded in.
    fn base_params(&self) -> QueryParameters {
        match self.debounce.peek() {
            Some(term) => self.state.params().with_term(term.as_str()),
            None => self.state.params().clone(),
        }
    }

    fn issue(&mut self, params: QueryParameters) {
        self.debounce.cancel();
        let token = self.state.begin(params);
        self.launch(token);
        self.publish();
    }

    /// Start the fetch for `token` against the current parameters.
    fn launch(&mut self, token: RequestToken) {
        if let Some(previous) = self.in_flight.take() {
            if self.config.abort_superseded && !previous.task.is_finished() {
                previous.task.abort();
                trace!(token = %previous.token, "superseded fetch aborted");
                self.emit(SessionEvent::Aborted {
                    token: previous.token,
                });
            }
        }

        let query = self.state.params().clone();
        debug!(
            token = %token,
            term = query.term(),
            page = query.page(),
            page_size = query.page_size(),
            "issuing fetch"
        );

        let fetcher = Arc::clone(&self.fetcher);
        let completions = self.completions_tx.clone();
        let params = query.clone();
        let task = tokio::spawn(async move {
            let result = fetcher.fetch(&params).await;
            let _ = completions.send(Completion { token, result });
        });

        self.in_flight = Some(InFlight {
            token,
            task: task.abort_handle(),
        });
        self.emit(SessionEvent::Issued { token, query });
    }

    fn on_completion(&mut self, completion: Completion) {
        let Completion { token, result } = completion;
        if self.in_flight.as_ref().is_some_and(|f| f.token == token) {
            self.in_flight = None;
        }

        match self.state.reconcile(token, result.map_err(ErrorKind::from)) {
            Reconciliation::Accepted { total_count, rows } => {
                debug!(token = %token, rows, total_count, "results accepted");
                self.publish();
                self.emit(SessionEvent::Accepted {
                    token,
                    total_count,
                    rows,
                });
            }
            Reconciliation::Failed(kind) => {
                match &kind {
                    ErrorKind::MalformedResponse(msg) => {
                        error!(token = %token, error = %msg, "catalog API returned a malformed response")
                    }
                    ErrorKind::Network(failure) => {
                        warn!(token = %token, error = %failure, "fetch failed")
                    }
                }
                self.publish();
                self.emit(SessionEvent::Failed { token, error: kind });
            }
            Reconciliation::Discarded => {
                trace!(token = %token, "stale completion discarded");
                self.emit(SessionEvent::Discarded { token });
            }
        }
    }

    fn publish(&self) {
        self.view.send_replace(self.state.view().clone());
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Cloneable front door to a running `SearchSession`.
///
/// Change methods return once the session has applied the change, so a
/// snapshot taken afterwards already reflects it. Invalid pages and page
/// sizes are rejected here and never reach the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<ViewState>,
    events: broadcast::Sender<SessionEvent>,
    max_page_size: Option<u32>,
}

impl SessionHandle {
    /// Set the search term once typing goes quiet.
    pub async fn set_term(&self, term: impl Into<String>) -> Result<(), SessionError> {
        self.send(Change::Term(term.into())).await
    }

    /// Apply a search term immediately.
    pub async fn submit_term(&self, term: impl Into<String>) -> Result<(), SessionError> {
        self.send(Change::SubmitTerm(term.into())).await
    }

    /// Show another page. Asking for the current page fetches it again.
    pub async fn set_page(&self, page: u32) -> Result<(), SessionError> {
        validate_page(page)?;
        self.send(Change::Page(page)).await
    }

    /// Change the page size and go back to the first page.
    pub async fn set_page_size(&self, size: u32) -> Result<(), SessionError> {
        validate_page_size(size, self.max_page_size)?;
        self.send(Change::PageSize(size)).await
    }

    /// Fetch the current parameters again.
    pub async fn retry(&self) -> Result<(), SessionError> {
        self.send(Change::Retry).await
    }

    /// The current view.
    pub fn snapshot(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    /// Wait until nothing is loading and no typed term is waiting.
    pub async fn settled(&self) -> Result<ViewState, SessionError> {
        let mut view = self.view.clone();
        let settled = view
            .wait_for(ViewState::is_settled)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(settled.clone())
    }

    /// Stream of session events from now on.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Largest page size this session accepts.
    pub fn max_page_size(&self) -> Option<u32> {
        self.max_page_size
    }

    async fn send(&self, change: Change) -> Result<(), SessionError> {
        let (ack, applied) = oneshot::channel();
        self.commands
            .send(Command { change, ack })
            .await
            .map_err(|_| SessionError::Closed)?;
        applied.await.map_err(|_| SessionError::Closed)?
    }
}
