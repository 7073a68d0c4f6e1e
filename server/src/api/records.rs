//! Record endpoints: hotels, rooms and wishlist

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use stayhub_core::records::{self, HotelPayload, RoomPayload, WishlistKeyPayload, WishlistPayload};

use super::{bad_request, core_error, ApiResponse};
use crate::state::AppState;

/// POST /hotel/add-hotel
pub async fn add_hotel(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let payload: HotelPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(e) => return bad_request(&format!("Invalid hotel payload: {}", e)),
    };

    match records::add_hotel(&state.store, payload) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok("Hotel added successfully"))),
        Err(e) => core_error(e),
    }
}

/// POST /hotelRoom/add
pub async fn add_room(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let payload: RoomPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(e) => return bad_request(&format!("Invalid room payload: {}", e)),
    };

    match records::add_room(&state.store, payload) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Hotel room added successfully")),
        ),
        Err(e) => core_error(e),
    }
}

/// GET /hotels
pub async fn get_hotels(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ApiResponse>) {
    match records::list_hotels(&state.store) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::with_rows(rows))),
        Err(e) => core_error(e),
    }
}

/// GET /rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ApiResponse>) {
    match records::list_rooms(&state.store) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::with_rows(rows))),
        Err(e) => core_error(e),
    }
}

/// POST /wishlist/add
pub async fn add_to_wishlist(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let payload: WishlistPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(e) => return bad_request(&format!("Invalid wishlist payload: {}", e)),
    };

    match records::add_to_wishlist(&state.store, payload) {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Hotel added to wishlist successfully")),
        ),
        Err(e) => core_error(e),
    }
}

/// GET /wishlist/:customer_id
pub async fn get_wishlist(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    match records::wishlist_for_customer(&state.store, &customer_id) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::with_rows(rows))),
        Err(e) => core_error(e),
    }
}

/// POST or DELETE /wishlist/remove
pub async fn remove_from_wishlist(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let key: WishlistKeyPayload = match serde_json::from_value(body) {
        Ok(key) => key,
        Err(e) => return bad_request(&format!("Invalid wishlist key: {}", e)),
    };

    match records::remove_from_wishlist(&state.store, key) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Hotel removed from wishlist successfully")),
        ),
        Err(e) => core_error(e),
    }
}
