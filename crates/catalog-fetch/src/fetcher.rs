//! Results fetchers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::{QueryParameters, ResultPage};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::payload::parse_page;
use crate::request::HttpRequest;
use crate::timeout::DEFAULT_TOTAL_TIMEOUT;
use crate::transport::{TcpTransport, Transport};

/// Performs one remote lookup for a set of query parameters.
///
/// `params` are assumed valid. Implementations return at most
/// `params.page_size()` rows, report the full match count for the term, and
/// never retry.
#[async_trait]
pub trait ResultsFetcher: Send + Sync {
    async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchError>;
}

#[async_trait]
impl<F: ResultsFetcher + ?Sized> ResultsFetcher for Arc<F> {
    async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchError> {
        (**self).fetch(params).await
    }
}

#[async_trait]
impl<F: ResultsFetcher + ?Sized> ResultsFetcher for Box<F> {
    async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchError> {
        (**self).fetch(params).await
    }
}

/// Fetches result pages from the catalog HTTP API.
#[derive(Debug, Clone)]
pub struct HttpResultsFetcher<T = TcpTransport> {
    config: ApiConfig,
    transport: T,
}

impl HttpResultsFetcher<TcpTransport> {
    /// Create a fetcher using the built-in TCP transport.
    pub fn new(config: ApiConfig) -> Self {
        let transport = TcpTransport::new(config.timeout);
        Self { config, transport }
    }
}

impl<T: Transport> HttpResultsFetcher<T> {
    /// Create a fetcher over a custom transport.
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The API configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build the GET request for `params`.
    pub fn build_request(&self, params: &QueryParameters) -> HttpRequest {
        HttpRequest::get(self.config.endpoint_url())
            .query(&self.config.query_param, params.term())
            .query(&self.config.page_param, params.page().to_string())
            .query(&self.config.page_size_param, params.page_size().to_string())
            .accept("application/json")
            .header("User-Agent", &self.config.user_agent)
    }
}

#[async_trait]
impl<T: Transport> ResultsFetcher for HttpResultsFetcher<T> {
    async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchError> {
        let request = self.build_request(params);
        let limit = self.config.timeout.total;

        debug!(url = %request.full_url(), "fetching results");
        let response = tokio::time::timeout(limit, self.transport.send(request))
            .await
            .map_err(|_| FetchError::timeout(limit))??
            .error_for_status()?;

        let page = parse_page(response.bytes(), params)?;
        debug!(
            rows = page.len(),
            total = page.total_count(),
            "fetched results"
        );
        Ok(page)
    }
}

/// Gives any fetcher a ceiling so a lookup resolves even if the network hangs.
#[derive(Debug, Clone)]
pub struct TimeoutFetcher<F> {
    inner: F,
    limit: Duration,
}

impl<F: ResultsFetcher> TimeoutFetcher<F> {
    pub fn new(inner: F, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// The ceiling applied to each lookup.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn get_ref(&self) -> &F {
        &self.inner
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: ResultsFetcher> From<F> for TimeoutFetcher<F> {
    fn from(inner: F) -> Self {
        Self::new(inner, DEFAULT_TOTAL_TIMEOUT)
    }
}

#[async_trait]
impl<F: ResultsFetcher> ResultsFetcher for TimeoutFetcher<F> {
    async fn fetch(&self, params: &QueryParameters) -> Result<ResultPage, FetchError> {
        match tokio::time::timeout(self.limit, self.inner.fetch(params)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::timeout(self.limit)),
        }
    }
}
