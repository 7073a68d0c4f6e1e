//! Record services for the three entity kinds
//!
//! Each submodule owns one table (schema constants, typed inbound payload,
//! required-field validation and row mapping) and the service operations
//! the HTTP layer calls. Validation follows loose truthiness: a required
//! field counts as missing when it is absent, null, an empty string or
//! zero, and every missing field is reported, not just the first.

pub mod hotel;
pub mod room;
pub mod wishlist;

pub use hotel::{add_hotel, list_hotels, HotelPayload};
pub use room::{add_room, list_rooms, RoomPayload};
pub use wishlist::{
    add_to_wishlist, remove_from_wishlist, wishlist_for_customer, WishlistKeyPayload,
    WishlistPayload,
};

use chrono::Utc;
use serde_json::Value;

/// Render a stored value the way it compares: strings without quotes,
/// everything else as its JSON text. Stored ids may be numeric even when
/// the caller sends strings, so comparisons go through this.
pub fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Server-clock timestamp stamped onto every created record
pub(crate) fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Loose truthiness for an optional string field
pub(crate) fn str_missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.is_empty())
}

/// Loose truthiness for an optional JSON value field
pub(crate) fn value_missing(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Serialize a structured field into its cell representation
pub(crate) fn structured_cell(value: Option<Value>, default: Value) -> crate::Result<Value> {
    let value = value.unwrap_or(default);
    Ok(Value::String(serde_json::to_string(&value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_string() {
        assert_eq!(value_as_string(&json!("42")), "42");
        assert_eq!(value_as_string(&json!(42)), "42");
        assert_eq!(value_as_string(&json!(true)), "true");
    }

    #[test]
    fn test_value_missing_truthiness() {
        assert!(value_missing(&None));
        assert!(value_missing(&Some(json!(null))));
        assert!(value_missing(&Some(json!(""))));
        assert!(value_missing(&Some(json!(0))));
        assert!(value_missing(&Some(json!(0.0))));
        assert!(value_missing(&Some(json!(false))));

        assert!(!value_missing(&Some(json!("x"))));
        assert!(!value_missing(&Some(json!(5))));
        assert!(!value_missing(&Some(json!(-1))));
    }

    #[test]
    fn test_structured_cell_serializes_to_string() {
        let cell = structured_cell(Some(json!({"wifi": true})), json!({})).unwrap();
        assert_eq!(cell, json!("{\"wifi\":true}"));

        let cell = structured_cell(None, json!([])).unwrap();
        assert_eq!(cell, json!("[]"));
    }
}
