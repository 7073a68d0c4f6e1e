//! Payment endpoints: order creation, status checks and the webhook
//!
//! The webhook is the one handler that never reports failure through the
//! HTTP status: Telr retries on anything but 200, so processing errors
//! are logged and acknowledged with a success status regardless.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde_json::Value;

use stayhub_gateway::notification::{self, AuditEntry, WebhookEvent};
use stayhub_gateway::{CreateOrderRequest, GatewayError};

use super::{bad_request, ApiResponse};
use crate::state::AppState;

/// Map a gateway error onto its HTTP status and envelope
fn gateway_error(err: GatewayError) -> (StatusCode, Json<ApiResponse>) {
    let status = match &err {
        GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "gateway call failed");
    }
    (status, Json(ApiResponse::fail(&err.to_string())))
}

/// POST /api/telr/create-order
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let request: CreateOrderRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return bad_request(&format!("Invalid order payload: {}", e)),
    };

    match state.telr.create_order(request).await {
        Ok(remote) => (StatusCode::OK, Json(ApiResponse::with_data(remote))),
        Err(e) => gateway_error(e),
    }
}

/// POST /api/telr/check-status
pub async fn check_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let order_ref = body
        .get("orderRef")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match state.telr.check_status(&order_ref).await {
        Ok(remote) => (StatusCode::OK, Json(ApiResponse::with_data(remote))),
        Err(e) => gateway_error(e),
    }
}

/// POST /api/telr/webhook
///
/// Takes the raw body rather than the JSON extractor so a malformed
/// delivery still reaches the always-acknowledge path.
pub async fn webhook(body: Bytes) -> (StatusCode, Json<ApiResponse>) {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse webhook body");
            return (
                StatusCode::OK,
                Json(ApiResponse::fail("Error processing webhook")),
            );
        }
    };

    let event = WebhookEvent::from_payload(&payload);
    tracing::info!(
        order_ref = event.order_ref.as_deref().unwrap_or("<unknown>"),
        status = event.status().as_str(),
        "received payment webhook"
    );

    notification::dispatch(&event);
    AuditEntry::new(&event, &payload).record();

    let mut response = ApiResponse::ok("Webhook processed successfully");
    response.order_ref = event.order_ref;
    (StatusCode::OK, Json(response))
}
