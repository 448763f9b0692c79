// Server module - builds the HTTP surface over the catalog service

use axum::Router;
use sea_orm::DatabaseConnection;
use std::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;

/// Build the API router with database connection.
///
/// With no configured origins the CORS layer is permissive, matching
/// single-user local use.
pub fn build_router(db: DatabaseConnection, allowed_origins: &[String]) -> Router {
    let api_router = api::api_router(db);

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<axum::http::HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::error!("Failed to parse CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Find an available port starting from the preferred port
pub fn find_available_port(preferred_port: u16) -> Option<u16> {
    // Try preferred port first
    if TcpListener::bind(("0.0.0.0", preferred_port)).is_ok() {
        return Some(preferred_port);
    }

    // Scan next 100 ports
    ((preferred_port + 1)..(preferred_port + 100))
        .find(|&port| TcpListener::bind(("0.0.0.0", port)).is_ok())
}
