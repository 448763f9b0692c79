use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;

use crate::domain::CatalogError;
use crate::services::catalog_service;

use super::books::{filter_from_params, ListParams};

/// Download the catalog as CSV. Accepts the same shelf/status filters
/// as the list endpoint so the export matches the current view.
pub async fn export_catalog(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let filter = match filter_from_params(&params) {
        Ok(filter) => filter,
        Err(e) => return super::error_response(e),
    };

    let books = match catalog_service::list_books(&db, filter).await {
        Ok(books) => books,
        Err(e) => return super::error_response(e),
    };

    let csv = match write_csv(&books) {
        Ok(csv) => csv,
        Err(e) => return super::error_response(e),
    };

    let filename = format!("library_export_{}.csv", chrono::Utc::now().format("%Y-%m-%d"));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/csv".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename)
            .parse()
            .unwrap(),
    );

    (StatusCode::OK, headers, csv).into_response()
}

fn write_csv(books: &[crate::models::book::Model]) -> Result<String, CatalogError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record([
            "id",
            "isbn",
            "title",
            "author",
            "shelf_location",
            "cover_url",
            "status",
            "borrowed_by",
            "borrowed_date",
            "created_at",
        ])
        .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

    for book in books {
        let id = book.id.to_string();
        writer
            .write_record([
                id.as_str(),
                book.isbn.as_str(),
                book.title.as_str(),
                book.author.as_str(),
                book.shelf_location.as_str(),
                book.cover_url.as_str(),
                book.status.as_str(),
                book.borrowed_by.as_str(),
                book.borrowed_date.as_str(),
                book.created_at.as_str(),
            ])
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| CatalogError::Unavailable(e.to_string()))
}
