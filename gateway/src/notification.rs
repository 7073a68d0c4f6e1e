//! Webhook notification parsing
//!
//! Telr delivers asynchronous payment notifications after out-of-band
//! events. Extraction never fails: every field is optional, and a payload
//! of any shape produces an event (possibly with everything unset). The
//! receiver dispatches on the status code purely for observability and
//! records an audit entry for every delivery.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

/// Payment status carried by a webhook notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment authorised (code 3)
    Authorised,

    /// Payment declined (code 2)
    Declined,

    /// Payment cancelled by the customer (code -1)
    Cancelled,

    /// Any other or absent status code
    Other,
}

impl PaymentStatus {
    /// Map a Telr status code onto a payment status
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(3) => PaymentStatus::Authorised,
            Some(2) => PaymentStatus::Declined,
            Some(-1) => PaymentStatus::Cancelled,
            _ => PaymentStatus::Other,
        }
    }

    /// Lowercase label for logs and audit entries
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Authorised => "authorised",
            PaymentStatus::Declined => "declined",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other => "other",
        }
    }
}

/// Fields extracted from a webhook notification
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookEvent {
    /// Telr order reference
    pub order_ref: Option<String>,

    /// Cart / booking id the order was created with
    pub cart_id: Option<Value>,

    /// Numeric status code
    pub status_code: Option<i64>,

    /// Human-readable status text
    pub status_text: Option<String>,

    /// Transaction reference
    pub transaction_ref: Option<String>,

    /// Order amount
    pub amount: Option<Value>,

    /// Order currency
    pub currency: Option<String>,
}

impl WebhookEvent {
    /// Extract an event from a notification payload of any shape
    pub fn from_payload(payload: &Value) -> Self {
        let get_str = |pointer: &str| {
            payload
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        WebhookEvent {
            order_ref: get_str("/order/ref"),
            cart_id: payload.pointer("/order/cartid").cloned(),
            status_code: payload.pointer("/order/status/code").and_then(Value::as_i64),
            status_text: get_str("/order/status/text"),
            transaction_ref: get_str("/order/transaction/ref"),
            amount: payload.pointer("/order/amount").cloned(),
            currency: get_str("/order/currency"),
        }
    }

    /// Payment status derived from the status code
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::from_code(self.status_code)
    }
}

/// Dispatch a webhook event for observability
///
/// None of the branches mutate stored records yet; booking-status updates
/// and customer notifications are deferred until the bookings datastore
/// exists.
pub fn dispatch(event: &WebhookEvent) {
    let order_ref = event.order_ref.as_deref().unwrap_or("<unknown>");
    match event.status() {
        PaymentStatus::Authorised => {
            tracing::info!(order_ref, "payment authorised");
            update_booking_status(event, "paid");
        }
        PaymentStatus::Declined => {
            tracing::warn!(order_ref, "payment declined");
            update_booking_status(event, "failed");
        }
        PaymentStatus::Cancelled => {
            tracing::info!(order_ref, "payment cancelled");
            update_booking_status(event, "cancelled");
        }
        PaymentStatus::Other => {
            tracing::info!(order_ref, code = ?event.status_code, "payment status update");
        }
    }
}

/// Deferred booking-status hook; becomes a datastore write once bookings
/// are persisted server-side.
fn update_booking_status(event: &WebhookEvent, status: &str) {
    tracing::debug!(
        cart_id = %event.cart_id.as_ref().unwrap_or(&serde_json::Value::Null),
        status,
        "booking status update deferred"
    );
}

/// Audit-log entry recorded for every webhook delivery
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Server-side receipt timestamp
    pub timestamp: String,

    /// Derived payment status label
    pub status: &'static str,

    /// Extracted fields
    #[serde(flatten)]
    pub event: WebhookEvent,

    /// Raw payload as delivered
    pub payload: Value,
}

impl AuditEntry {
    /// Build an audit entry for a delivery
    pub fn new(event: &WebhookEvent, payload: &Value) -> Self {
        AuditEntry {
            timestamp: Utc::now().to_rfc3339(),
            status: event.status().as_str(),
            event: event.clone(),
            payload: payload.clone(),
        }
    }

    /// Record the entry in the audit log
    pub fn record(&self) {
        match serde_json::to_string(self) {
            Ok(entry) => tracing::info!(target: "webhook_audit", %entry, "webhook event logged"),
            Err(e) => tracing::error!(error = %e, "failed to serialize audit entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification() -> Value {
        json!({
            "order": {
                "ref": "OR123",
                "cartid": "BK-1001",
                "amount": "250.00",
                "currency": "AED",
                "status": { "code": 3, "text": "Authorised" },
                "transaction": { "ref": "TX999" }
            }
        })
    }

    #[test]
    fn test_extracts_every_field() {
        let event = WebhookEvent::from_payload(&notification());

        assert_eq!(event.order_ref.as_deref(), Some("OR123"));
        assert_eq!(event.cart_id, Some(json!("BK-1001")));
        assert_eq!(event.status_code, Some(3));
        assert_eq!(event.status_text.as_deref(), Some("Authorised"));
        assert_eq!(event.transaction_ref.as_deref(), Some("TX999"));
        assert_eq!(event.amount, Some(json!("250.00")));
        assert_eq!(event.currency.as_deref(), Some("AED"));
        assert_eq!(event.status(), PaymentStatus::Authorised);
    }

    #[test]
    fn test_extraction_never_fails() {
        for payload in [json!(null), json!("garbage"), json!({}), json!({"order": 7})] {
            let event = WebhookEvent::from_payload(&payload);
            assert!(event.order_ref.is_none());
            assert_eq!(event.status(), PaymentStatus::Other);
        }
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(PaymentStatus::from_code(Some(3)), PaymentStatus::Authorised);
        assert_eq!(PaymentStatus::from_code(Some(2)), PaymentStatus::Declined);
        assert_eq!(PaymentStatus::from_code(Some(-1)), PaymentStatus::Cancelled);
        assert_eq!(PaymentStatus::from_code(Some(0)), PaymentStatus::Other);
        assert_eq!(PaymentStatus::from_code(Some(99)), PaymentStatus::Other);
        assert_eq!(PaymentStatus::from_code(None), PaymentStatus::Other);
    }

    #[test]
    fn test_audit_entry_carries_raw_payload() {
        let payload = notification();
        let event = WebhookEvent::from_payload(&payload);
        let entry = AuditEntry::new(&event, &payload);

        assert_eq!(entry.status, "authorised");
        assert_eq!(entry.payload, payload);

        let as_json = serde_json::to_value(&entry).unwrap();
        assert_eq!(as_json["order_ref"], json!("OR123"));
        assert_eq!(as_json["payload"]["order"]["ref"], json!("OR123"));
    }
}
