//! Client library for the Telr payment gateway
//!
//! This crate owns everything that speaks Telr: the outbound order
//! create/status client and the parsing of inbound webhook notifications.

#![forbid(unsafe_code)]

pub mod client;
pub mod notification;

pub use client::{CreateOrderRequest, CustomerInfo, GatewayError, ReturnUrls, TelrClient};
pub use notification::{AuditEntry, PaymentStatus, WebhookEvent};
