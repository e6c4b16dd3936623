//! Data model for the product catalog browser.
//!
//! This crate provides:
//! - `QueryParameters` - Search term, page and page size for one lookup
//! - `ProductRecord` / `ResultPage` - One page of scraped products plus the match count
//! - `Pagination` - Page arithmetic derived from a result count
//! - `ViewState` - Read-only projection consumed by displays
//! - `ColumnSpec` / `TableProps` - Contract with the table renderer

mod error;
mod product;
mod query;
mod results;
mod table;
mod view;

pub use error::*;
pub use product::*;
pub use query::*;
pub use results::*;
pub use table::*;
pub use view::*;
