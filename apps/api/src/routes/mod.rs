//! # HTTP Routes
//!
//! | Method | Path                               | Handler                    |
//! |--------|------------------------------------|----------------------------|
//! | GET    | `/`                                | [`health::banner`]         |
//! | GET    | `/health`                          | [`health::health`]         |
//! | GET    | `/api/menu-items`                  | [`menu::list_items`]       |
//! | POST   | `/api/menu-items`                  | [`menu::create_item`]      |
//! | GET    | `/api/menu-items/categories`       | [`menu::list_categories`]  |
//! | GET    | `/api/menu-items/{id}`             | [`menu::get_item`]         |
//! | PUT    | `/api/menu-items/{id}`             | [`menu::update_item`]      |
//! | DELETE | `/api/menu-items/{id}`             | [`menu::delete_item`]      |
//! | PATCH  | `/api/menu-items/{id}/toggle`      | [`menu::toggle_item`]      |
//! | GET    | `/api/orders`                      | [`order::list_orders`]     |
//! | POST   | `/api/orders`                      | [`order::finalize_order`]  |
//! | GET    | `/api/orders/{id}`                 | [`order::get_order`]       |
//! | GET    | `/api/orders/bill/{bill_number}`   | [`order::get_by_bill`]     |
//!
//! Every route sits behind a CORS layer built from
//! [`ApiConfig::cors_origins`](crate::config::ApiConfig::cors_origins).

pub mod health;
pub mod menu;
pub mod order;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::HeaderValue;
use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejections use the API error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor whose rejections use the API error shape.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health))
        .route(
            "/api/menu-items",
            get(menu::list_items).post(menu::create_item),
        )
        .route("/api/menu-items/categories", get(menu::list_categories))
        .route(
            "/api/menu-items/{id}",
            get(menu::get_item)
                .put(menu::update_item)
                .delete(menu::delete_item),
        )
        .route("/api/menu-items/{id}/toggle", patch(menu::toggle_item))
        .route(
            "/api/orders",
            get(order::list_orders).post(order::finalize_order),
        )
        .route("/api/orders/{id}", get(order::get_order))
        .route("/api/orders/bill/{bill_number}", get(order::get_by_bill))
        .layer(cors)
        .with_state(state)
}

/// An empty list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
