//! HTTP API surface
//!
//! Routes, the success/failure envelope and the error-to-status mapping.
//! Every failure crossing a handler boundary is converted into the
//! envelope; nothing panics across it.

pub mod payments;
pub mod records;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;

use stayhub_core::CoreError;

use crate::state::AppState;

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Human-readable outcome message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Result rows or relayed gateway body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Number of rows in `data`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Order reference, echoed by the webhook acknowledgment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_ref: Option<String>,
}

impl ApiResponse {
    /// Success with a message only
    pub fn ok(message: &str) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data: None,
            count: None,
            order_ref: None,
        }
    }

    /// Success carrying data rows and their count
    pub fn with_rows(rows: Vec<serde_json::Map<String, Value>>) -> Self {
        let count = rows.len();
        ApiResponse {
            success: true,
            message: None,
            data: Some(Value::Array(rows.into_iter().map(Value::Object).collect())),
            count: Some(count),
            order_ref: None,
        }
    }

    /// Success relaying an arbitrary data body
    pub fn with_data(data: Value) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            order_ref: None,
        }
    }

    /// Failure with a message
    pub fn fail(message: &str) -> Self {
        ApiResponse {
            success: false,
            message: Some(message.to_string()),
            data: None,
            count: None,
            order_ref: None,
        }
    }
}

/// Map a core error onto its HTTP status and envelope
pub fn core_error(err: CoreError) -> (StatusCode, Json<ApiResponse>) {
    let status = match &err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
    }
    (status, Json(ApiResponse::fail(&err.to_string())))
}

/// 400 with a validation message
pub fn bad_request(message: &str) -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::fail(message)))
}

/// Create the API router with the shared state
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/hotel/add-hotel", post(records::add_hotel))
        .route("/hotelRoom/add", post(records::add_room))
        .route("/hotels", get(records::get_hotels))
        .route("/rooms", get(records::get_rooms))
        .route("/wishlist/add", post(records::add_to_wishlist))
        .route(
            "/wishlist/remove",
            post(records::remove_from_wishlist).delete(records::remove_from_wishlist),
        )
        .route("/wishlist/:customer_id", get(records::get_wishlist))
        .route("/api/telr/create-order", post(payments::create_order))
        .route("/api/telr/check-status", post(payments::check_status))
        .route("/api/telr/webhook", post(payments::webhook))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "success",
        "message": "Hotel booking backend is running"
    }))
}
