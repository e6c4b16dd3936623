//! Scraped product records.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::ProductField;

/// A product as returned by the catalog API.
///
/// The browser never interprets these fields; they are passed through to the
/// display unchanged. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default, alias = "upcCode", alias = "upc")]
    pub upc_code: Option<String>,
    #[serde(default, alias = "scrapeDate")]
    pub scrape_date: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProductRecord {
    /// Create a record with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: None,
            store: None,
            upc_code: None,
            scrape_date: None,
            price: None,
            url: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Cell text for a column. Missing values render as an empty string.
    pub fn display(&self, field: ProductField) -> Cow<'_, str> {
        let text = match field {
            ProductField::Name => Some(self.name.as_str()),
            ProductField::Brand => self.brand.as_deref(),
            ProductField::Store => self.store.as_deref(),
            ProductField::UpcCode => self.upc_code.as_deref(),
            ProductField::ScrapeDate => self.scrape_date.as_deref(),
            ProductField::Url => self.url.as_deref(),
            ProductField::Price => {
                return self
                    .price
                    .as_ref()
                    .map(|p| Cow::Owned(p.to_string()))
                    .unwrap_or(Cow::Borrowed(""));
            }
        };
        Cow::Borrowed(text.unwrap_or(""))
    }
}

/// A price exactly as the API sent it.
///
/// Decimal columns are commonly serialized as strings, so both JSON numbers
/// and strings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snake_case() {
        let record: ProductRecord = serde_json::from_str(
            r#"{
                "name": "2% Milk",
                "brand": "Neilson",
                "store": "LOBLAWS",
                "upc_code": "0006870000019",
                "scrape_date": "2021-03-02",
                "price": "4.99",
                "url": "https://example.com/p/1"
            }"#,
        )
        .unwrap();

        assert_eq!(record.name, "2% Milk");
        assert_eq!(record.upc_code.as_deref(), Some("0006870000019"));
        assert_eq!(record.price, Some(Price::Text("4.99".to_string())));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_deserialize_aliases_and_numeric_price() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"name": "Bread", "upcCode": "123", "scrapeDate": "2021-01-01", "price": 2.5}"#,
        )
        .unwrap();

        assert_eq!(record.upc_code.as_deref(), Some("123"));
        assert_eq!(record.scrape_date.as_deref(), Some("2021-01-01"));
        assert_eq!(record.price, Some(Price::Number(2.5)));
        assert_eq!(record.brand, None);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"name": "Eggs", "id": 42, "most_recent": true}"#).unwrap();

        assert_eq!(record.extra.get("id"), Some(&serde_json::json!(42)));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["most_recent"], serde_json::json!(true));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result: Result<ProductRecord, _> = serde_json::from_str(r#"{"brand": "X"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let mut record = ProductRecord::named("Cheese");
        record.price = Some(Price::Number(7.0));

        assert_eq!(record.display(ProductField::Name), "Cheese");
        assert_eq!(record.display(ProductField::Price), "7");
        assert_eq!(record.display(ProductField::Brand), "");
    }
}
