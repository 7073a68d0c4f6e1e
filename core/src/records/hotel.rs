//! Hotel record service
//!
//! Validates inbound hotel payloads and maps them into the Hotels table.
//! Hotel codes are an identity key but NOT enforced unique: inserting the
//! same code twice produces two rows.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{str_missing, structured_cell, timestamp_now, value_missing};
use crate::error::{CoreError, Result};
use crate::store::TableStore;

/// Name of the hotels table
pub const HOTELS_TABLE: &str = "Hotels";

/// Column schema of the hotels table
pub const HOTEL_SCHEMA: &[&str] = &[
    "Hotel Code",
    "Name",
    "Rating",
    "Address",
    "City ID",
    "Country Code",
    "Latitude",
    "Longitude",
    "Facilities",
    "Images",
    "Created At",
];

/// Inbound hotel payload
///
/// Every field is optional at the wire level; required-field policy is
/// applied by [`HotelPayload::missing_fields`]. The storefront sends
/// coordinates as `map_lat` / `map_lon`, accepted here as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelPayload {
    /// Supplier hotel code
    #[serde(default)]
    pub hotel_code: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Star rating; zero counts as missing
    #[serde(default)]
    pub rating: Option<Value>,

    /// Street address
    #[serde(default)]
    pub address: Option<String>,

    /// Supplier city id
    #[serde(default)]
    pub city_id: Option<Value>,

    /// ISO country code
    #[serde(default)]
    pub country_code: Option<String>,

    /// Latitude, defaults to 0
    #[serde(default, alias = "map_lat")]
    pub latitude: Option<f64>,

    /// Longitude, defaults to 0
    #[serde(default, alias = "map_lon")]
    pub longitude: Option<f64>,

    /// Arbitrary facilities structure, serialized into its cell
    #[serde(default)]
    pub facilities: Option<Value>,

    /// Ordered image list, serialized into its cell
    #[serde(default)]
    pub images: Option<Value>,
}

impl HotelPayload {
    /// Names of every required field that is absent or falsy
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if str_missing(&self.hotel_code) {
            missing.push("hotel_code".to_string());
        }
        if str_missing(&self.name) {
            missing.push("name".to_string());
        }
        if value_missing(&self.rating) {
            missing.push("rating".to_string());
        }
        if str_missing(&self.address) {
            missing.push("address".to_string());
        }
        missing
    }

    /// Map the payload into a row in schema order
    pub fn into_row(self, created_at: &str) -> Result<Vec<Value>> {
        Ok(vec![
            json!(self.hotel_code.unwrap_or_default()),
            json!(self.name.unwrap_or_default()),
            self.rating.unwrap_or_else(|| json!(0)),
            json!(self.address.unwrap_or_default()),
            self.city_id.unwrap_or_else(|| json!(0)),
            json!(self.country_code.unwrap_or_default()),
            json!(self.latitude.unwrap_or(0.0)),
            json!(self.longitude.unwrap_or(0.0)),
            structured_cell(self.facilities, json!({}))?,
            structured_cell(self.images, json!([]))?,
            json!(created_at),
        ])
    }
}

/// Validate a hotel payload and append it to the Hotels table
pub fn add_hotel(store: &TableStore, payload: HotelPayload) -> Result<()> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(CoreError::Validation(missing));
    }

    store.ensure_table(HOTELS_TABLE, HOTEL_SCHEMA)?;
    let row = payload.into_row(&timestamp_now())?;
    store.append_row(HOTELS_TABLE, row)?;
    tracing::info!(table = HOTELS_TABLE, "hotel record stored");
    Ok(())
}

/// All hotel rows in insertion order
pub fn list_hotels(store: &TableStore) -> Result<Vec<Map<String, Value>>> {
    store.scan(HOTELS_TABLE)
}
