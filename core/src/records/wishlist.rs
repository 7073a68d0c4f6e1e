//! Wishlist record service
//!
//! The wishlist carries one extra rule on top of the table store: at most
//! one row per (customer, hotel) pair, compared stringwise because stored
//! ids may be numeric. Adding an existing pair is an idempotent success.
//!
//! The generated wishlist id is `WL` plus a 5-digit zero-padded counter
//! derived from the current row count. The count is read and the row
//! appended inside one locked store operation, so concurrent adds cannot
//! allocate colliding ids.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{str_missing, structured_cell, timestamp_now, value_as_string, value_missing};
use crate::error::{CoreError, Result};
use crate::store::{AppendOutcome, TableStore};

/// Name of the wishlist table
pub const WISHLIST_TABLE: &str = "Wishlist";

/// Column schema of the wishlist table
pub const WISHLIST_SCHEMA: &[&str] = &[
    "Wishlist ID",
    "Customer ID",
    "Hotel Code",
    "Hotel Name",
    "Hotel Rating",
    "Address",
    "City",
    "Country",
    "Price",
    "Currency",
    "Image URL",
    "Search Params",
    "Created At",
];

/// Inbound wishlist payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishlistPayload {
    /// Customer identifier; may arrive as a number or a string
    #[serde(default)]
    pub customer_id: Option<Value>,

    /// Hotel being wished for
    #[serde(default)]
    pub hotel_code: Option<String>,

    /// Hotel display name snapshot
    #[serde(default)]
    pub hotel_name: Option<String>,

    /// Hotel rating snapshot, defaults to 0
    #[serde(default)]
    pub hotel_rating: Option<Value>,

    /// Address snapshot
    #[serde(default)]
    pub address: Option<String>,

    /// City snapshot
    #[serde(default)]
    pub city: Option<String>,

    /// Country snapshot
    #[serde(default)]
    pub country: Option<String>,

    /// Displayed price, defaults to 0
    #[serde(default)]
    pub price: Option<Value>,

    /// Price currency, defaults to "USD"
    #[serde(default)]
    pub currency: Option<String>,

    /// Thumbnail URL
    #[serde(default)]
    pub image_url: Option<String>,

    /// Search context the wish was made from, serialized into its cell
    #[serde(default)]
    pub search_params: Option<Value>,
}

impl WishlistPayload {
    /// Names of every required field that is absent or falsy
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if value_missing(&self.customer_id) {
            missing.push("customer_id".to_string());
        }
        if str_missing(&self.hotel_code) {
            missing.push("hotel_code".to_string());
        }
        missing
    }

    /// Map the payload into a row in schema order
    ///
    /// The wishlist id slot is filled with the given id; callers that
    /// allocate the id later may pass a placeholder and overwrite slot 0.
    pub fn into_row(self, wishlist_id: &str, created_at: &str) -> Result<Vec<Value>> {
        Ok(vec![
            json!(wishlist_id),
            self.customer_id.unwrap_or_else(|| json!("")),
            json!(self.hotel_code.unwrap_or_default()),
            json!(self.hotel_name.unwrap_or_default()),
            self.hotel_rating.unwrap_or_else(|| json!(0)),
            json!(self.address.unwrap_or_default()),
            json!(self.city.unwrap_or_default()),
            json!(self.country.unwrap_or_default()),
            self.price.unwrap_or_else(|| json!(0)),
            json!(self.currency.unwrap_or_else(|| "USD".to_string())),
            json!(self.image_url.unwrap_or_default()),
            structured_cell(self.search_params, json!({}))?,
            json!(created_at),
        ])
    }
}

/// Key identifying one wishlist entry, used by the remove operation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishlistKeyPayload {
    /// Customer identifier
    #[serde(default)]
    pub customer_id: Option<Value>,

    /// Hotel code
    #[serde(default)]
    pub hotel_code: Option<Value>,
}

impl WishlistKeyPayload {
    /// Names of every required field that is absent or falsy
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if value_missing(&self.customer_id) {
            missing.push("customer_id".to_string());
        }
        if value_missing(&self.hotel_code) {
            missing.push("hotel_code".to_string());
        }
        missing
    }
}

/// Format a positional wishlist id
fn wishlist_id(row_count: usize) -> String {
    format!("WL{:05}", row_count + 1)
}

/// Look up a cell without assuming the column exists
///
/// An existing table file's header is trusted as-is, so a file written
/// with an older or foreign schema may lack a column; treat the cell as
/// null rather than panicking inside a predicate.
fn cell<'a>(row: &'a Map<String, Value>, key: &str) -> &'a Value {
    row.get(key).unwrap_or(&Value::Null)
}

/// Add a hotel to a customer's wishlist
///
/// Returns `AlreadyPresent` without writing when the (customer, hotel)
/// pair already has a row.
pub fn add_to_wishlist(store: &TableStore, payload: WishlistPayload) -> Result<AppendOutcome> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(CoreError::Validation(missing));
    }

    store.ensure_table(WISHLIST_TABLE, WISHLIST_SCHEMA)?;

    let customer = value_as_string(payload.customer_id.as_ref().unwrap_or(&Value::Null));
    let hotel = payload.hotel_code.clone().unwrap_or_default();
    let mut row = payload.into_row("", &timestamp_now())?;

    let outcome = store.append_row_unique(
        WISHLIST_TABLE,
        |existing| {
            value_as_string(cell(existing, "Customer ID")) == customer
                && value_as_string(cell(existing, "Hotel Code")) == hotel
        },
        move |row_count| {
            row[0] = json!(wishlist_id(row_count));
            row
        },
    )?;

    match outcome {
        AppendOutcome::Appended => {
            tracing::info!(table = WISHLIST_TABLE, "wishlist entry stored");
        }
        AppendOutcome::AlreadyPresent => {
            tracing::info!(table = WISHLIST_TABLE, "wishlist entry already present");
        }
    }
    Ok(outcome)
}

/// All wishlist rows for one customer, matched stringwise
pub fn wishlist_for_customer(
    store: &TableStore,
    customer_id: &str,
) -> Result<Vec<Map<String, Value>>> {
    store.filter(WISHLIST_TABLE, |row| {
        value_as_string(cell(row, "Customer ID")) == customer_id
    })
}

/// Remove one wishlist entry by (customer, hotel) key
///
/// Deletes at most the first matching row. A missing table file or a
/// missing row both surface as `NotFound`.
pub fn remove_from_wishlist(store: &TableStore, key: WishlistKeyPayload) -> Result<()> {
    let missing = key.missing_fields();
    if !missing.is_empty() {
        return Err(CoreError::Validation(missing));
    }

    let customer = value_as_string(key.customer_id.as_ref().unwrap_or(&Value::Null));
    let hotel = value_as_string(key.hotel_code.as_ref().unwrap_or(&Value::Null));

    let deleted = store.delete_first_match(WISHLIST_TABLE, |row| {
        value_as_string(cell(row, "Customer ID")) == customer
            && value_as_string(cell(row, "Hotel Code")) == hotel
    })?;

    if deleted {
        tracing::info!(table = WISHLIST_TABLE, "wishlist entry removed");
        Ok(())
    } else {
        Err(CoreError::NotFound("Hotel not found in wishlist".to_string()))
    }
}
