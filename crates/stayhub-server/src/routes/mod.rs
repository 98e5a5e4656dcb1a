mod auth;
mod bookings;
mod listings;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::auth::middleware::require_auth;
use crate::config::Config;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

async fn health() -> &'static str {
    "API is running..."
}

pub fn create_router(state: AppState) -> Router {
    // Rate limit: auth routes, 10 requests per 60 seconds per IP
    let auth_governor = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .finish()
        .unwrap();

    // Rate limit: public listing search, 30 requests per 60 seconds per IP
    let public_governor = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(30)
        .finish()
        .unwrap();

    // Rate limit: protected API, 120 requests per 60 seconds per IP
    let api_governor = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(120)
        .finish()
        .unwrap();

    // Health check, no rate limit
    let health_routes = Router::new().route("/health", get(health));

    // Auth routes get the strict limit
    let auth_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .layer(GovernorLayer::new(Arc::new(auth_governor)));

    // Public listing search and detail
    let public_routes = Router::new()
        .route("/api/listings", get(listings::list))
        .route("/api/listings/{id}", get(listings::get_by_id))
        .layer(GovernorLayer::new(Arc::new(public_governor)));

    let protected = Router::new()
        // Auth
        .route("/api/profile", get(auth::profile))
        .route("/api/logout", get(auth::logout))
        // Listings
        .route("/api/listings", post(listings::create))
        .route(
            "/api/listings/{id}",
            put(listings::update).delete(listings::delete),
        )
        .route("/api/host/listings", get(listings::host_listings))
        // Bookings
        .route("/api/booking", post(bookings::create))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(GovernorLayer::new(Arc::new(api_governor)));

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(public_routes)
        .merge(protected)
        .with_state(state)
}
