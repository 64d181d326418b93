//! The product document: the JSON array used for export files, imports,
//! legacy storage and remote sync payloads.

use crate::{error::Result, product::validate_records, Error, Product};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Default file name for exports.
pub const EXPORT_FILE_NAME: &str = "hd-products.json";

/// Serialize products as a pretty-printed JSON array.
pub fn to_json_pretty(products: &[Product]) -> Result<String> {
    serde_json::to_string_pretty(products).map_err(|e| Error::InvalidPayload(e.to_string()))
}

/// Serialize products as a compact JSON value, as sent to the remote store.
pub fn to_value(products: &[Product]) -> Result<Value> {
    serde_json::to_value(products).map_err(|e| Error::InvalidPayload(e.to_string()))
}

/// Parse a document into its raw records without validating them.
pub fn parse_records(json: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(json).map_err(|e| Error::InvalidPayload(e.to_string()))?;
    records_of(value)
}

/// Take the records out of an already-parsed document.
pub fn records_of(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        other => Err(Error::InvalidPayload(format!(
            "expected a JSON array, got {}",
            kind(&other)
        ))),
    }
}

/// Decode an import or sync document.
///
/// The top level must be an array; records without an `id` or `name` are
/// dropped.
pub fn decode_products(json: &str, now: DateTime<Utc>) -> Result<Vec<Product>> {
    let records = parse_records(json)?;
    Ok(validate_records(&records, now))
}

/// Decode a legacy flat-array document strictly: any invalid item fails the
/// whole document.
pub fn decode_legacy(json: &str, now: DateTime<Utc>) -> Result<Vec<Product>> {
    parse_records(json)?
        .iter()
        .map(|record| Product::from_record(record, now))
        .collect()
}

fn kind(value: &Value) -> &'static str {
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
    use crate::ProductFields;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn export_import_roundtrip() {
        let products = vec![
            Product::new("a", ProductFields::new("Hinge", "4").with_bay("2"), now()).unwrap(),
            Product::new("b", ProductFields::new("Glue", "11").with_notes("wood"), now()).unwrap(),
        ];

        let json = to_json_pretty(&products).unwrap();
        assert!(json.starts_with("[\n"));

        let restored = decode_products(&json, Utc::now()).unwrap();
        assert_eq!(restored, products);
    }

    #[test]
    fn reject_non_array() {
        let result = decode_products(r#"{"id": "1", "name": "A"}"#, now());
        assert_eq!(
            result,
            Err(Error::InvalidPayload("expected a JSON array, got an object".into()))
        );
    }

    #[test]
    fn reject_malformed_json() {
        assert!(matches!(
            decode_products("[{", now()),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn decode_drops_invalid_records() {
        let json = r#"[{"id":"1","name":"A"},{"name":"no id"},{"id":"2"}]"#;
        let products = decode_products(json, now()).unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "1");
    }

    #[test]
    fn legacy_is_strict() {
        let json = r#"[{"id":"1","name":"A","aisle":"3"},{"name":"no id"}]"#;
        assert_eq!(decode_legacy(json, now()), Err(Error::MissingField("id")));

        let json = r#"[{"id":"1","name":"A","aisle":"3","bay":"","notes":"","createdAt":"2023-05-05T08:00:00.000Z"}]"#;
        let products = decode_legacy(json, now()).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].aisle, "3");
    }
}
