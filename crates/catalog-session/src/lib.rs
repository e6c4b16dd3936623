//! Race-free search and pagination session for the product catalog.
//!
//! This crate provides:
//! - `SearchSession` - Actor turning change events into fetches and view updates
//! - `SessionHandle` - Cloneable front door for inputs and displays
//! - `SessionState` - The synchronous reconciliation state machine
//! - `Debouncer` - Coalesces bursts of typed terms
//! - `SessionConfig` - Page size, debounce, timeout and cancellation settings
//!
//! Every fetch carries a `RequestToken`. Only the completion whose token is
//! the latest issued one may touch the view; everything else is discarded,
//! whatever order the network answers in.

mod config;
mod debounce;
mod error;
mod event;
mod session;
mod state;
mod token;

pub use config::*;
pub use debounce::*;
pub use error::*;
pub use event::*;
pub use session::*;
pub use state::*;
pub use token::*;
