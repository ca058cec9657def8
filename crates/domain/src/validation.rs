//! Input validation applied before any store is touched.

use std::collections::HashSet;

use common::{InventoryEntry, MAX_PRODUCT_NAME_LEN, MIN_QUANTITY};
use serde_json::Value;

use crate::error::{CatalogError, Result};

/// Trims a product name and checks its length.
pub fn product_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CatalogError::InvalidInput(
            "Product name is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(CatalogError::InvalidInput(format!(
            "Product name must be between 1 and {MAX_PRODUCT_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Trims a product name taken from a request path.
///
/// Only emptiness is checked: an over-long name simply will not match any
/// stored product.
pub fn existing_product_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CatalogError::InvalidInput(
            "Product name parameter is required".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Returns the candidate entries if the payload is a sequence.
pub fn candidate_entries(payload: &Value) -> Result<&[Value]> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CatalogError::InvalidInput("Inventory must be an array".to_string()))
}

/// Checks the shape of a single candidate entry.
///
/// The name must be a non-blank string and the quantity an integer of at
/// least [`MIN_QUANTITY`] that fits in a `u32`.
pub fn candidate_entry(candidate: &Value) -> Result<InventoryEntry> {
    let name = candidate
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CatalogError::InvalidInput("Each item must have a valid name".to_string()))?;

    let quantity = candidate
        .get("quantity")
        .and_then(whole_quantity)
        .filter(|q| *q >= MIN_QUANTITY)
        .ok_or_else(|| {
            CatalogError::InvalidInput(format!("Item \"{name}\" must have a positive quantity"))
        })?;

    Ok(InventoryEntry::new(name, quantity))
}

/// Reads a JSON number as a `u32`, accepting integral floats such as `2.0`.
fn whole_quantity(value: &Value) -> Option<u32> {
    if let Some(q) = value.as_u64() {
        return u32::try_from(q).ok();
    }
    let q = value.as_f64()?;
    if q.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&q) {
        Some(q as u32)
    } else {
        None
    }
}

/// Returns the first name that appears more than once.
pub fn first_duplicate(entries: &[InventoryEntry]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .map(|e| e.name.as_str())
        .find(|name| !seen.insert(*name))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_name_is_trimmed() {
        assert_eq!(product_name("  Widget \n").unwrap(), "Widget");
    }

    #[test]
    fn blank_product_name_is_rejected() {
        for raw in ["", "   ", "\t"] {
            assert!(matches!(
                product_name(raw),
                Err(CatalogError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn product_name_length_counts_characters() {
        let exactly_max = "é".repeat(MAX_PRODUCT_NAME_LEN);
        assert!(product_name(&exactly_max).is_ok());

        let too_long = "a".repeat(MAX_PRODUCT_NAME_LEN + 1);
        assert!(matches!(
            product_name(&too_long),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn path_name_only_requires_content() {
        assert_eq!(existing_product_name(" Old Name ").unwrap(), "Old Name");
        assert!(existing_product_name("  ").is_err());
    }

    #[test]
    fn payload_must_be_array() {
        assert!(candidate_entries(&json!([])).unwrap().is_empty());
        for payload in [json!("not an array"), json!({}), json!(null), json!(3)] {
            let err = candidate_entries(&payload).unwrap_err();
            assert_eq!(err.to_string(), "Inventory must be an array");
        }
    }

    #[test]
    fn valid_entry_is_trimmed() {
        let entry = candidate_entry(&json!({ "name": " Widget ", "quantity": 5 })).unwrap();
        assert_eq!(entry, InventoryEntry::new("Widget", 5));
    }

    #[test]
    fn entry_name_must_be_a_non_empty_string() {
        for candidate in [
            json!({ "quantity": 5 }),
            json!({ "name": "", "quantity": 5 }),
            json!({ "name": "  ", "quantity": 5 }),
            json!({ "name": 42, "quantity": 5 }),
            json!("Widget"),
        ] {
            let err = candidate_entry(&candidate).unwrap_err();
            assert_eq!(err.to_string(), "Each item must have a valid name");
        }
    }

    #[test]
    fn entry_quantity_must_be_positive_integer() {
        for quantity in [
            json!(0),
            json!(-1),
            json!(2.5),
            json!("five"),
            json!(null),
            json!(u64::from(u32::MAX) + 1),
        ] {
            let err = candidate_entry(&json!({ "name": "Widget", "quantity": quantity }))
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Item \"Widget\" must have a positive quantity"
            );
        }
    }

    #[test]
    fn integral_float_quantity_is_accepted() {
        for quantity in [json!(2.0), json!(1.0)] {
            let entry =
                candidate_entry(&json!({ "name": "Widget", "quantity": quantity })).unwrap();
            assert_eq!(entry.quantity as f64, quantity.as_f64().unwrap());
        }
        assert!(candidate_entry(&json!({ "name": "Widget", "quantity": 0.0 })).is_err());
        assert!(candidate_entry(&json!({ "name": "Widget", "quantity": 4294967296.0 })).is_err());
    }

    #[test]
    fn missing_quantity_is_rejected() {
        assert!(candidate_entry(&json!({ "name": "Widget" })).is_err());
    }

    #[test]
    fn duplicates_found_regardless_of_position() {
        let entries = vec![
            InventoryEntry::new("A", 1),
            InventoryEntry::new("B", 1),
            InventoryEntry::new("C", 1),
            InventoryEntry::new("A", 2),
        ];
        assert_eq!(first_duplicate(&entries), Some("A"));
        assert_eq!(first_duplicate(&entries[..3]), None);
    }
}
