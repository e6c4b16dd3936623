//! Query parameters for a catalog lookup.

use serde::Serialize;

use crate::error::CatalogError;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The search term, page number and page size of one lookup.
///
/// Values are immutable: every update returns a new instance and leaves the
/// receiver untouched, including when the update is rejected. `page` and
/// `page_size` are always at least 1; an empty `term` means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryParameters {
    term: String,
    page: u32,
    page_size: u32,
}

impl QueryParameters {
    /// Start-of-session parameters: empty term, first page.
    pub fn new(page_size: u32) -> Result<Self, CatalogError> {
        validate_page_size(page_size, None)?;
        Ok(Self {
            term: String::new(),
            page: 1,
            page_size,
        })
    }

    /// Replace the search term. Changing the filter invalidates the previous
    /// page numbering, so the page goes back to 1.
    pub fn with_term(&self, term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            page: 1,
            page_size: self.page_size,
        }
    }

    /// Move to another page, keeping term and page size.
    pub fn with_page(&self, page: u32) -> Result<Self, CatalogError> {
        validate_page(page)?;
        Ok(Self {
            term: self.term.clone(),
            page,
            page_size: self.page_size,
        })
    }

    /// Change the page size. The page goes back to 1.
    pub fn with_page_size(&self, page_size: u32) -> Result<Self, CatalogError> {
        self.with_page_size_limit(page_size, None)
    }

    /// Change the page size, rejecting values above `max`.
    pub fn with_page_size_limit(
        &self,
        page_size: u32,
        max: Option<u32>,
    ) -> Result<Self, CatalogError> {
        validate_page_size(page_size, max)?;
        Ok(Self {
            term: self.term.clone(),
            page: 1,
            page_size,
        })
    }

    /// The free-text search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Current page (1-indexed).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether a search term narrows the result set.
    pub fn is_filtered(&self) -> bool {
        !self.term.is_empty()
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            term: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Check a page number without building parameters.
pub fn validate_page(page: u32) -> Result<(), CatalogError> {
    if page < 1 {
        return Err(CatalogError::invalid("page", page.into(), "must be at least 1"));
    }
    Ok(())
}

/// Check a page size against the lower bound and an optional ceiling.
pub fn validate_page_size(page_size: u32, max: Option<u32>) -> Result<(), CatalogError> {
    if page_size < 1 {
        return Err(CatalogError::invalid(
            "page_size",
            page_size.into(),
            "must be at least 1",
        ));
    }
    if let Some(max) = max {
        if page_size > max {
            return Err(CatalogError::invalid(
                "page_size",
                page_size.into(),
                "exceeds the configured maximum",
            ));
        }
    }
    Ok(())
}
