use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::domain::CatalogError;
use crate::models::{ReadingStatus, StatusFilter};
use crate::services::catalog_service::{self, BookFilter, NewBook};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub shelf: Option<String>,
    pub status: Option<String>,
}

/// Translate query parameters into a service filter. An unrecognized
/// status value is a caller error, not an empty result.
pub(crate) fn filter_from_params(params: &ListParams) -> Result<BookFilter, CatalogError> {
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(StatusFilter::parse(raw).ok_or_else(|| {
            CatalogError::Validation(format!("unknown status filter '{}'", raw))
        })?),
    };

    Ok(BookFilter {
        shelf: params.shelf.clone(),
        status,
    })
}

pub async fn list_books(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let filter = match filter_from_params(&params) {
        Ok(filter) => filter,
        Err(e) => return super::error_response(e),
    };

    match catalog_service::list_books(&db, filter).await {
        Ok(books) => Json(json!({
            "books": books,
            "total": books.len()
        }))
        .into_response(),
        Err(e) => super::error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub shelf_location: String,
    #[serde(default)]
    pub cover_url: String,
    pub status: ReadingStatus,
}

pub async fn create_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateBook>,
) -> impl IntoResponse {
    let input = NewBook {
        isbn: payload.isbn,
        title: payload.title,
        author: payload.author,
        shelf_location: payload.shelf_location,
        cover_url: payload.cover_url,
        status: payload.status,
    };

    match catalog_service::add_book(&db, input).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Book registered successfully",
                "book": model
            })),
        )
            .into_response(),
        Err(e) => super::error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub borrowed_by: String,
    pub status: ReadingStatus,
}

/// Reading status and lending always move together in one call.
pub async fn update_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBook>,
) -> impl IntoResponse {
    match catalog_service::update_book(&db, id, &payload.borrowed_by, payload.status).await {
        Ok(model) => Json(json!({
            "message": "Book updated successfully",
            "book": model
        }))
        .into_response(),
        Err(e) => super::error_response(e),
    }
}

pub async fn delete_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match catalog_service::delete_book(&db, id).await {
        Ok(()) => Json(json!({ "message": "Book deleted successfully" })).into_response(),
        Err(e) => super::error_response(e),
    }
}
