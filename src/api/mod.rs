pub mod books;
pub mod export;
pub mod health;
pub mod lookup;
pub mod stats;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::domain::CatalogError;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            axum::routing::put(books::update_book).delete(books::delete_book),
        )
        // Statistics
        .route("/stats", get(stats::get_statistics))
        .route("/stats/shelves", get(stats::shelf_occupancy))
        .route("/stats/authors", get(stats::author_distribution))
        // Lookup
        .route("/lookup/:isbn", get(lookup::lookup_book))
        // Export
        .route("/export", get(export::export_catalog))
        .with_state(db)
}

/// Map a service failure onto a response. Nothing here is fatal to the
/// process; an unreachable store surfaces as 503.
pub(crate) fn error_response(err: CatalogError) -> Response {
    let status = match &err {
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound => StatusCode::NOT_FOUND,
        CatalogError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CatalogError::Lookup(_) => StatusCode::BAD_GATEWAY,
    };

    if matches!(err, CatalogError::Unavailable(_)) {
        tracing::error!("{}", err);
    }

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
