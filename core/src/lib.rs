//! # Stayhub Core
//!
//! Core building blocks for the Stayhub hotel booking backend.
//! This crate provides the durable tabular record store, the per-entity
//! record services (hotels, rooms, wishlist) and the payment gateway
//! configuration.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod records;
pub mod store;

/// Re-export common types for ease of use
pub use config::{GatewayCredentials, GatewayMode, TelrConfig};
pub use error::{CoreError, Result};
pub use store::{AppendOutcome, TableStore};

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
