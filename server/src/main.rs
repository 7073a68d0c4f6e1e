mod api;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stayhub_core::records::hotel::{HOTELS_TABLE, HOTEL_SCHEMA};
use stayhub_core::records::room::{ROOMS_TABLE, ROOM_SCHEMA};
use stayhub_core::records::wishlist::{WISHLIST_SCHEMA, WISHLIST_TABLE};
use stayhub_core::{TableStore, TelrConfig};
use stayhub_gateway::client::TELR_API_URL;
use stayhub_gateway::TelrClient;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stayhub backend");

    // Bootstrap the record store and its three tables
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
    let store = TableStore::new(&data_dir);
    for (table, schema) in [
        (HOTELS_TABLE, HOTEL_SCHEMA),
        (ROOMS_TABLE, ROOM_SCHEMA),
        (WISHLIST_TABLE, WISHLIST_SCHEMA),
    ] {
        store
            .ensure_table(table, schema)
            .expect("failed to initialize table files");
        tracing::info!(table, path = %store.table_path(table).display(), "table ready");
    }

    // Gateway configuration; never log the key material itself
    let telr_config = TelrConfig::from_env();
    tracing::info!(
        test_mode = telr_config.is_test_mode(),
        test_credentials = telr_config.test.is_some(),
        live_credentials = telr_config.live.is_some(),
        "Telr gateway configured"
    );
    let telr_endpoint =
        std::env::var("TELR_API_URL").unwrap_or_else(|_| TELR_API_URL.to_string());
    let telr = TelrClient::with_endpoint(telr_config, &telr_endpoint);

    let app_state = Arc::new(AppState { store, telr });

    let app = api::create_router(app_state)
        .layer(TraceLayer::new_for_http())
        // The storefront runs on another origin; mirror the original's
        // CORS-for-all-routes behavior.
        .layer(CorsLayer::permissive());

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "5001".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid port number");

    tracing::info!("Available API endpoints:");
    for endpoint in [
        "GET  /health",
        "POST /hotel/add-hotel",
        "POST /hotelRoom/add",
        "GET  /hotels",
        "GET  /rooms",
        "POST /wishlist/add",
        "GET  /wishlist/:customer_id",
        "POST /wishlist/remove",
        "POST /api/telr/create-order",
        "POST /api/telr/check-status",
        "POST /api/telr/webhook",
    ] {
        tracing::info!("  {}", endpoint);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
