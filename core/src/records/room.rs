//! Room record service

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{str_missing, structured_cell, timestamp_now};
use crate::error::{CoreError, Result};
use crate::store::TableStore;

/// Name of the rooms table
pub const ROOMS_TABLE: &str = "Rooms";

/// Column schema of the rooms table
pub const ROOM_SCHEMA: &[&str] = &[
    "Room ID",
    "Hotel Code",
    "Booking Code",
    "Room Name",
    "Base Price",
    "Total Fare",
    "Currency",
    "Is Refundable",
    "Day Rates",
    "Extras",
    "Created At",
];

/// Inbound room payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomPayload {
    /// Supplier room id
    #[serde(default)]
    pub room_id: Option<String>,

    /// Hotel this room belongs to
    #[serde(default)]
    pub hotel_code: Option<String>,

    /// Supplier booking code
    #[serde(default)]
    pub booking_code: Option<String>,

    /// Display name
    #[serde(default)]
    pub room_name: Option<String>,

    /// Nightly base price, defaults to 0
    #[serde(default)]
    pub base_price: Option<f64>,

    /// Total fare, defaults to 0
    #[serde(default)]
    pub total_fare: Option<f64>,

    /// Fare currency
    #[serde(default)]
    pub currency: Option<String>,

    /// Whether the fare is refundable, defaults to false
    #[serde(default)]
    pub is_refundable: Option<bool>,

    /// Per-day rate breakdown, serialized into its cell
    #[serde(default)]
    pub day_rates: Option<Value>,

    /// Extra charges, serialized into its cell
    #[serde(default)]
    pub extras: Option<Value>,
}

impl RoomPayload {
    /// Names of every required field that is absent or falsy
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if str_missing(&self.room_id) {
            missing.push("room_id".to_string());
        }
        if str_missing(&self.hotel_code) {
            missing.push("hotel_code".to_string());
        }
        if str_missing(&self.booking_code) {
            missing.push("booking_code".to_string());
        }
        if str_missing(&self.room_name) {
            missing.push("room_name".to_string());
        }
        missing
    }

    /// Map the payload into a row in schema order
    pub fn into_row(self, created_at: &str) -> Result<Vec<Value>> {
        Ok(vec![
            json!(self.room_id.unwrap_or_default()),
            json!(self.hotel_code.unwrap_or_default()),
            json!(self.booking_code.unwrap_or_default()),
            json!(self.room_name.unwrap_or_default()),
            json!(self.base_price.unwrap_or(0.0)),
            json!(self.total_fare.unwrap_or(0.0)),
            json!(self.currency.unwrap_or_default()),
            json!(self.is_refundable.unwrap_or(false)),
            structured_cell(self.day_rates, json!({}))?,
            structured_cell(self.extras, json!({}))?,
            json!(created_at),
        ])
    }
}

/// Validate a room payload and append it to the Rooms table
pub fn add_room(store: &TableStore, payload: RoomPayload) -> Result<()> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(CoreError::Validation(missing));
    }

    store.ensure_table(ROOMS_TABLE, ROOM_SCHEMA)?;
    let row = payload.into_row(&timestamp_now())?;
    store.append_row(ROOMS_TABLE, row)?;
    tracing::info!(table = ROOMS_TABLE, "room record stored");
    Ok(())
}

/// All room rows in insertion order
pub fn list_rooms(store: &TableStore) -> Result<Vec<Map<String, Value>>> {
    store.scan(ROOMS_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payload() -> RoomPayload {
        RoomPayload {
            room_id: Some("R1".to_string()),
            hotel_code: Some("H1".to_string()),
            booking_code: Some("B1".to_string()),
            room_name: Some("Deluxe King".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_fields_lists_every_field() {
        let missing = RoomPayload::default().missing_fields();
        assert_eq!(
            missing,
            vec!["room_id", "hotel_code", "booking_code", "room_name"]
        );
    }

    #[test]
    fn test_defaults_in_mapped_row() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        add_room(&store, payload()).unwrap();

        let rows = list_rooms(&store).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["Base Price"], json!(0.0));
        assert_eq!(row["Total Fare"], json!(0.0));
        assert_eq!(row["Currency"], json!(""));
        assert_eq!(row["Is Refundable"], json!(false));
        assert_eq!(row["Day Rates"], json!("{}"));
        assert_eq!(row["Extras"], json!("{}"));
    }

    #[test]
    fn test_fare_fields_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        let mut p = payload();
        p.base_price = Some(120.5);
        p.total_fare = Some(241.0);
        p.currency = Some("AED".to_string());
        p.is_refundable = Some(true);
        p.day_rates = Some(json!({"2026-01-01": 120.5}));
        add_room(&store, p).unwrap();

        let row = &list_rooms(&store).unwrap()[0];
        assert_eq!(row["Base Price"], json!(120.5));
        assert_eq!(row["Total Fare"], json!(241.0));
        assert_eq!(row["Currency"], json!("AED"));
        assert_eq!(row["Is Refundable"], json!(true));
        let day_rates: Value = serde_json::from_str(row["Day Rates"].as_str().unwrap()).unwrap();
        assert_eq!(day_rates, json!({"2026-01-01": 120.5}));
    }

    #[test]
    fn test_validation_failure_appends_nothing() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());

        let result = add_room(&store, RoomPayload::default());
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert!(list_rooms(&store).unwrap().is_empty());
    }
}
