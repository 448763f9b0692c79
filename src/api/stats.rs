use axum::{extract::State, response::IntoResponse, Json};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::services::catalog_service;

pub async fn get_statistics(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match catalog_service::statistics(&db).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => super::error_response(e),
    }
}

pub async fn shelf_occupancy(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match catalog_service::shelf_occupancy(&db).await {
        Ok(shelves) => Json(json!({ "shelves": shelves })).into_response(),
        Err(e) => super::error_response(e),
    }
}

pub async fn author_distribution(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match catalog_service::author_distribution(&db).await {
        Ok(authors) => Json(json!({ "authors": authors })).into_response(),
        Err(e) => super::error_response(e),
    }
}
