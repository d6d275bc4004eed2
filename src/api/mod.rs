use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod cart;
mod error;
mod orders;
mod products;
mod validation;

pub use error::{ApiError, FieldError};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub config: Config,
}

/// Build the full application router. The store must already be seeded:
/// construct → seed → router is the initialization order.
pub fn router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            state.config.session.expiry_hours,
        )));

    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let api_router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/cart", get(cart::list_cart).post(cart::add_to_cart))
        .route(
            "/cart/{id}",
            axum::routing::patch(cart::update_cart_item).delete(cart::remove_cart_item),
        )
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .layer(session_layer)
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
