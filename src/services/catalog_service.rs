//! Catalog Service - record lifecycle, filtering and statistics

use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::CatalogError;
use crate::models::book::{self, Entity as BookEntity};
use crate::models::{ReadingStatus, StatusFilter};

/// Input for registering a book. Lending fields always start empty.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub shelf_location: String,
    pub cover_url: String,
    pub status: ReadingStatus,
}

/// Filter parameters for listing books
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub shelf: Option<String>,
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total: i64,
    pub read: i64,
    pub on_loan: i64,
}

/// Group name with record count, for the occupancy/distribution views
#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
}

/// Register a new book. Rejects empty title or shelf location; duplicate
/// ISBNs are permitted.
pub async fn add_book(
    db: &DatabaseConnection,
    input: NewBook,
) -> Result<book::Model, CatalogError> {
    if input.title.trim().is_empty() {
        return Err(CatalogError::Validation("title is required".to_string()));
    }
    if input.shelf_location.trim().is_empty() {
        return Err(CatalogError::Validation(
            "shelf location is required".to_string(),
        ));
    }

    let now = chrono::Utc::now();

    let new_book = book::ActiveModel {
        isbn: Set(input.isbn),
        title: Set(input.title),
        author: Set(input.author),
        shelf_location: Set(input.shelf_location),
        cover_url: Set(input.cover_url),
        status: Set(input.status.as_str().to_string()),
        borrowed_by: Set(String::new()),
        borrowed_date: Set(String::new()),
        created_at: Set(now.to_rfc3339()),
        ..Default::default()
    };

    let model = new_book.insert(db).await?;
    tracing::info!("Registered book {} ('{}')", model.id, model.title);

    Ok(model)
}

/// List books, most recently added first.
///
/// The status filter runs at the DB level; the shelf filter is a
/// case-insensitive substring match applied in memory.
pub async fn list_books(
    db: &DatabaseConnection,
    filter: BookFilter,
) -> Result<Vec<book::Model>, CatalogError> {
    let mut query = BookEntity::find();

    match filter.status {
        Some(StatusFilter::Status(status)) => {
            query = query.filter(book::Column::Status.eq(status.as_str()));
        }
        Some(StatusFilter::OnLoan) => {
            query = query.filter(book::Column::BorrowedBy.ne(""));
        }
        None => {}
    }

    let mut books = query
        .order_by_desc(book::Column::Id)
        .all(db)
        .await?;

    if let Some(shelf) = &filter.shelf {
        if !shelf.is_empty() {
            let needle = shelf.to_lowercase();
            books.retain(|b| b.shelf_location.to_lowercase().contains(&needle));
        }
    }

    Ok(books)
}

/// Update reading status and lending together, atomically.
///
/// A non-empty borrower stamps `borrowed_date` with the current local
/// time; an empty borrower clears it. Re-lending overwrites the prior
/// borrower (last write wins).
pub async fn update_book(
    db: &DatabaseConnection,
    id: i32,
    borrowed_by: &str,
    status: ReadingStatus,
) -> Result<book::Model, CatalogError> {
    let model = BookEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(CatalogError::NotFound)?;

    let borrowed_date = if borrowed_by.is_empty() {
        String::new()
    } else {
        Local::now().format("%Y-%m-%d %H:%M").to_string()
    };

    let mut active: book::ActiveModel = model.into();
    active.status = Set(status.as_str().to_string());
    active.borrowed_by = Set(borrowed_by.to_string());
    active.borrowed_date = Set(borrowed_date);

    let updated = active.update(db).await?;
    Ok(updated)
}

/// Delete a book permanently. No tombstone is kept.
pub async fn delete_book(db: &DatabaseConnection, id: i32) -> Result<(), CatalogError> {
    let res = BookEntity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(CatalogError::NotFound);
    }
    tracing::info!("Deleted book {}", id);
    Ok(())
}

/// Aggregate counts: total records, finished reads, records on loan.
pub async fn statistics(db: &DatabaseConnection) -> Result<CatalogStats, CatalogError> {
    let total = BookEntity::find().count(db).await?;
    let read = BookEntity::find()
        .filter(book::Column::Status.eq(ReadingStatus::Read.as_str()))
        .count(db)
        .await?;
    let on_loan = BookEntity::find()
        .filter(book::Column::BorrowedBy.ne(""))
        .count(db)
        .await?;

    Ok(CatalogStats {
        total: total as i64,
        read: read as i64,
        on_loan: on_loan as i64,
    })
}

/// Record counts grouped by shelf location, busiest shelf first.
pub async fn shelf_occupancy(db: &DatabaseConnection) -> Result<Vec<GroupCount>, CatalogError> {
    let books = BookEntity::find().all(db).await?;
    Ok(group_counts(books.into_iter().map(|b| b.shelf_location)))
}

/// Record counts grouped by author, most collected author first.
pub async fn author_distribution(
    db: &DatabaseConnection,
) -> Result<Vec<GroupCount>, CatalogError> {
    let books = BookEntity::find().all(db).await?;
    Ok(group_counts(books.into_iter().map(|b| b.author)))
}

fn group_counts(names: impl Iterator<Item = String>) -> Vec<GroupCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(name, count)| GroupCount { name, count })
        .collect();

    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    groups
}
