use axum::{extract::Path, response::IntoResponse, Json};

use crate::openlibrary;

/// Look up title, author and cover for an ISBN. A miss or upstream
/// failure is non-fatal; the client falls back to manual entry.
pub async fn lookup_book(Path(isbn): Path<String>) -> impl IntoResponse {
    let base_url = openlibrary::base_url_from_env();

    match openlibrary::fetch_book_metadata(&base_url, &isbn).await {
        Ok(metadata) => Json(metadata).into_response(),
        Err(e) => {
            tracing::warn!("ISBN lookup failed for {}: {}", isbn, e);
            super::error_response(e)
        }
    }
}
