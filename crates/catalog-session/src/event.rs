//! Session diagnostics.

use catalog_core::{ErrorKind, QueryParameters};
use serde::Serialize;

use crate::token::RequestToken;

/// What the session did, in order. Receivers that fall behind miss events;
/// the view itself is always available through the snapshot channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A fetch was started.
    Issued {
        token: RequestToken,
        query: QueryParameters,
    },
    /// The latest fetch succeeded and the view shows its rows.
    Accepted {
        token: RequestToken,
        total_count: u64,
        rows: usize,
    },
    /// The latest fetch failed and the view records the error.
    Failed {
        token: RequestToken,
        error: ErrorKind,
    },
    /// A superseded fetch resolved and was ignored.
    Discarded { token: RequestToken },
    /// A superseded fetch task was aborted before it resolved.
    Aborted { token: RequestToken },
    /// A typed term is waiting for the input to go quiet.
    TermDeferred { term: String },
}

impl SessionEvent {
    /// The token this event concerns, if any.
    pub fn token(&self) -> Option<RequestToken> {
        match self {
            Self::Issued { token, .. }
            | Self::Accepted { token, .. }
            | Self::Failed { token, .. }
            | Self::Discarded { token }
            | Self::Aborted { token } => Some(*token),
            Self::TermDeferred { .. } => None,
        }
    }
}
