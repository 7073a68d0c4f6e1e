//! Shared application state

use stayhub_core::TableStore;
use stayhub_gateway::TelrClient;

/// State shared by every request handler
pub struct AppState {
    /// Durable record store backing the hotel, room and wishlist tables
    pub store: TableStore,

    /// Telr payment gateway client
    pub telr: TelrClient,
}
