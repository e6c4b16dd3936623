//! Request tokens.

use std::fmt;

use serde::Serialize;

/// Identifies one issued fetch. Later fetches get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints strictly increasing tokens, starting at 1.
#[derive(Debug, Default)]
pub struct TokenMint {
    last: u64,
}

impl TokenMint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }

    /// The most recently minted token.
    pub fn last(&self) -> Option<RequestToken> {
        (self.last > 0).then_some(RequestToken(self.last))
    }
}
