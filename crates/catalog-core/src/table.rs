//! Contract with the table renderer.

use std::sync::Arc;

use serde::Serialize;

use crate::product::ProductRecord;
use crate::results::Pagination;

/// A product column the table can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Name,
    Brand,
    Store,
    UpcCode,
    ScrapeDate,
    Price,
    Url,
}

impl ProductField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Brand => "brand",
            Self::Store => "store",
            Self::UpcCode => "upc_code",
            Self::ScrapeDate => "scrape_date",
            Self::Price => "price",
            Self::Url => "url",
        }
    }
}

/// A column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    /// Header text.
    pub label: &'static str,
    /// Field rendered in this column.
    pub field: ProductField,
    /// Whether the table may sort on this column.
    pub sortable: bool,
}

impl ColumnSpec {
    pub const fn new(label: &'static str, field: ProductField, sortable: bool) -> Self {
        Self {
            label,
            field,
            sortable,
        }
    }
}

/// Default product columns, in display order.
pub fn product_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Name", ProductField::Name, true),
        ColumnSpec::new("Brand", ProductField::Brand, true),
        ColumnSpec::new("Store", ProductField::Store, true),
        ColumnSpec::new("UPC", ProductField::UpcCode, true),
        ColumnSpec::new("Scrape Date", ProductField::ScrapeDate, true),
        ColumnSpec::new("Price", ProductField::Price, true),
        ColumnSpec::new("URL", ProductField::Url, false),
    ]
}

/// Everything a table renderer needs for one frame.
///
/// Page and page-size changes go back through the session handle.
#[derive(Debug, Clone, Serialize)]
pub struct TableProps {
    pub columns: Vec<ColumnSpec>,
    pub rows: Arc<[ProductRecord]>,
    pub loading: bool,
    pub total_count: u64,
    pub pagination: Pagination,
}

impl TableProps {
    /// Cell text for every row, one `Vec` per row in column order.
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| row.display(c.field).into_owned())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_columns() {
        let columns = product_columns();
        let labels: Vec<&str> = columns.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec!["Name", "Brand", "Store", "UPC", "Scrape Date", "Price", "URL"]
        );
        assert!(columns.iter().filter(|c| !c.sortable).all(|c| c.field == ProductField::Url));
    }

    #[test]
    fn test_cells() {
        let mut record = ProductRecord::named("Milk");
        record.store = Some("WALMART".to_string());
        let props = TableProps {
            columns: vec![
                ColumnSpec::new("Name", ProductField::Name, true),
                ColumnSpec::new("Store", ProductField::Store, true),
            ],
            rows: vec![record].into(),
            loading: false,
            total_count: 1,
            pagination: Pagination::new(1, 10, 1),
        };

        assert_eq!(props.cells(), vec![vec!["Milk".to_string(), "WALMART".to_string()]]);
    }
}
