//! Mapping of API payloads onto result pages.
//!
//! Catalog endpoints disagree on field names, so every shape this client
//! accepts is handled here and nowhere else:
//!
//! - an envelope object with rows under `results`, `data`, `rows`,
//!   `products` or `items` and a count under `count`, `total`,
//!   `total_count`, `totalCount` or `total_rows`;
//! - an envelope without a count whose `next` link is null, in which case
//!   the count is derived from the page position;
//! - a bare array from an unpaginated endpoint, sliced to the requested page.

use catalog_core::{ProductRecord, QueryParameters, ResultPage};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::FetchError;

const ROW_KEYS: [&str; 5] = ["results", "data", "rows", "products", "items"];
const TOTAL_KEYS: [&str; 5] = ["count", "total", "total_count", "totalCount", "total_rows"];

/// Map a response body onto a result page for `params`.
///
/// The returned page never holds more than `params.page_size()` rows.
pub fn parse_page(body: &[u8], params: &QueryParameters) -> Result<ResultPage, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::malformed(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Array(items) => parse_unpaginated(items, params),
        Value::Object(map) => parse_envelope(map, params),
        other => Err(FetchError::malformed(format!(
            "expected an object or array, got {}",
            json_type(&other)
        ))),
    }
}

fn parse_envelope(mut map: Map<String, Value>, params: &QueryParameters) -> Result<ResultPage, FetchError> {
    let (key, rows) = ROW_KEYS
        .iter()
        .find_map(|k| map.remove(*k).map(|v| (*k, v)))
        .ok_or_else(|| {
            FetchError::malformed(format!("no row list (looked for {})", ROW_KEYS.join(", ")))
        })?;

    let items = match rows {
        Value::Array(items) => items,
        other => {
            return Err(FetchError::malformed(format!(
                "`{}` must be an array, got {}",
                key,
                json_type(&other)
            )))
        }
    };

    let mut rows = decode_rows(items)?;
    truncate_to_page(&mut rows, params);

    let total = match TOTAL_KEYS.iter().find_map(|k| map.get(*k).map(|v| (*k, v))) {
        Some((key, value)) => value.as_u64().ok_or_else(|| {
            FetchError::malformed(format!("`{}` must be a non-negative integer, got {}", key, value))
        })?,
        None => match map.get("next") {
            Some(Value::Null) => params.offset() + rows.len() as u64,
            Some(_) => {
                return Err(FetchError::malformed(
                    "no total count and more pages follow",
                ))
            }
            None => {
                return Err(FetchError::malformed(format!(
                    "no total count (looked for {})",
                    TOTAL_KEYS.join(", ")
                )))
            }
        },
    };

    Ok(ResultPage::new(rows, total))
}

fn parse_unpaginated(items: Vec<Value>, params: &QueryParameters) -> Result<ResultPage, FetchError> {
    let total = items.len() as u64;
    let page: Vec<Value> = items
        .into_iter()
        .skip(usize::try_from(params.offset()).unwrap_or(usize::MAX))
        .take(params.page_size() as usize)
        .collect();

    Ok(ResultPage::new(decode_rows(page)?, total))
}

fn decode_rows(items: Vec<Value>) -> Result<Vec<ProductRecord>, FetchError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| FetchError::malformed(format!("row {}: {}", i, e)))
        })
        .collect()
}

fn truncate_to_page(rows: &mut Vec<ProductRecord>, params: &QueryParameters) {
    let limit = params.page_size() as usize;
    if rows.len() > limit {
        warn!(
            returned = rows.len(),
            page_size = limit,
            "server returned more rows than requested, dropping the excess"
        );
        rows.truncate(limit);
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(page: u32, size: u32) -> QueryParameters {
        QueryParameters::new(size).unwrap().with_page(page).unwrap()
    }

    fn products(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"name": format!("p{}", i)})).collect()
    }

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    // === Envelope shapes ===

    #[test]
    fn test_drf_envelope() {
        let payload = json!({
            "count": 137,
            "next": "http://api.test/p/?page=2",
            "previous": null,
            "results": products(10),
        });
        let page = parse_page(&body(payload), &params(1, 10)).unwrap();

        assert_eq!(page.len(), 10);
        assert_eq!(page.total_count(), 137);
        assert_eq!(page.rows()[0].name, "p0");
    }

    #[test]
    fn test_data_total_envelope() {
        let payload = json!({"page": 2, "per_page": 6, "total": 12, "data": products(6)});
        let page = parse_page(&body(payload), &params(2, 6)).unwrap();
        assert_eq!(page.total_count(), 12);
        assert_eq!(page.len(), 6);
    }

    #[test]
    fn test_camel_case_total() {
        let payload = json!({"totalCount": 3, "items": products(3)});
        let page = parse_page(&body(payload), &params(1, 10)).unwrap();
        assert_eq!(page.total_count(), 3);
    }

    #[test]
    fn test_total_derived_from_last_page() {
        let payload = json!({"next": null, "results": products(4)});
        let page = parse_page(&body(payload), &params(3, 10)).unwrap();
        assert_eq!(page.total_count(), 24);
    }

    #[test]
    fn test_total_missing_with_more_pages() {
        let payload = json!({"next": "http://api.test/?page=2", "results": products(10)});
        let err = parse_page(&body(payload), &params(1, 10)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_total_missing_entirely() {
        let err = parse_page(&body(json!({"results": []})), &params(1, 10)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_excess_rows_are_dropped() {
        let payload = json!({"count": 40, "results": products(20)});
        let page = parse_page(&body(payload), &params(1, 10)).unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page.total_count(), 40);
    }

    // === Bare arrays ===

    #[test]
    fn test_bare_array_is_sliced() {
        let page = parse_page(&body(Value::Array(products(25))), &params(3, 10)).unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.total_count(), 25);
        assert_eq!(page.rows()[0].name, "p20");
    }

    #[test]
    fn test_bare_array_past_end() {
        let page = parse_page(&body(Value::Array(products(5))), &params(2, 10)).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count(), 5);
    }

    // === Malformed payloads ===

    #[test]
    fn test_not_json() {
        let err = parse_page(b"<html>Server Error</html>", &params(1, 10)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_rows_not_array() {
        let err = parse_page(&body(json!({"count": 1, "results": {}})), &params(1, 10)).unwrap_err();
        assert_eq!(
            err,
            FetchError::Malformed("`results` must be an array, got an object".to_string())
        );
    }

    #[test]
    fn test_negative_total() {
        let err = parse_page(&body(json!({"count": -1, "results": []})), &params(1, 10)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_row_without_name() {
        let payload = json!({"count": 1, "results": [{"brand": "x"}]});
        let err = parse_page(&body(payload), &params(1, 10)).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(msg) if msg.starts_with("row 0")));
    }

    #[test]
    fn test_scalar_payload() {
        let err = parse_page(b"42", &params(1, 10)).unwrap_err();
        assert_eq!(
            err,
            FetchError::Malformed("expected an object or array, got a number".to_string())
        );
    }
}
