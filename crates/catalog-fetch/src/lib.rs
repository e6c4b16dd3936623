//! Results fetcher for the product catalog API.
//!
//! This crate provides:
//! - `ResultsFetcher` - One remote lookup per `QueryParameters`
//! - `HttpResultsFetcher` - GET against the catalog API with a total timeout
//! - `TimeoutFetcher` - Ceiling for any fetcher so lookups never hang
//! - `Transport` / `TcpTransport` - The HTTP round trip itself
//! - `ApiConfig` / `TimeoutConfig` - Endpoint, parameter names and timeouts
//!
//! Fetchers never retry. Retrying is the caller's decision.

mod config;
mod error;
mod fetcher;
mod payload;
mod request;
mod response;
mod timeout;
mod transport;

pub use config::*;
pub use error::*;
pub use fetcher::*;
pub use payload::parse_page;
pub use request::*;
pub use response::*;
pub use timeout::*;
pub use transport::*;
