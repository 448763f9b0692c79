use kitaplik::db;
use kitaplik::domain::CatalogError;
use kitaplik::models::{ReadingStatus, StatusFilter};
use kitaplik::services::catalog_service::{self, BookFilter, NewBook};
use sea_orm::DatabaseConnection;

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn sample_book(title: &str, shelf: &str) -> NewBook {
    NewBook {
        isbn: String::new(),
        title: title.to_string(),
        author: "Unknown".to_string(),
        shelf_location: shelf.to_string(),
        cover_url: String::new(),
        status: ReadingStatus::ToRead,
    }
}

#[tokio::test]
async fn add_assigns_unique_ids_and_starts_with_empty_lending() {
    let db = setup_test_db().await;

    let first = catalog_service::add_book(
        &db,
        NewBook {
            isbn: "9780000000001".to_string(),
            author: "Frank Herbert".to_string(),
            cover_url: "https://covers.example/dune.jpg".to_string(),
            ..sample_book("Dune", "Salon-A1")
        },
    )
    .await
    .expect("Failed to add book");

    let second = catalog_service::add_book(&db, sample_book("Solaris", "Salon-A2"))
        .await
        .expect("Failed to add book");

    assert_ne!(first.id, second.id);
    assert_eq!(first.isbn, "9780000000001");
    assert_eq!(first.title, "Dune");
    assert_eq!(first.author, "Frank Herbert");
    assert_eq!(first.shelf_location, "Salon-A1");
    assert_eq!(first.cover_url, "https://covers.example/dune.jpg");
    assert_eq!(first.status, "to_read");
    assert_eq!(first.borrowed_by, "");
    assert_eq!(first.borrowed_date, "");
    assert!(!first.created_at.is_empty());

    let books = catalog_service::list_books(&db, BookFilter::default())
        .await
        .expect("Failed to list books");
    assert_eq!(books.len(), 2);
}

#[tokio::test]
async fn add_rejects_empty_title_and_shelf() {
    let db = setup_test_db().await;

    let err = catalog_service::add_book(&db, sample_book("", "Salon-A1"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    let err = catalog_service::add_book(&db, sample_book("Dune", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    // Catalog must be unchanged after rejected adds
    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!(stats.total, 0);
}

#[tokio::test]
async fn duplicate_isbns_are_permitted() {
    let db = setup_test_db().await;

    let book = NewBook {
        isbn: "9780000000001".to_string(),
        ..sample_book("Dune", "Salon-A1")
    };
    catalog_service::add_book(&db, book.clone()).await.unwrap();
    catalog_service::add_book(&db, book).await.unwrap();

    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!(stats.total, 2);
}

#[tokio::test]
async fn list_returns_most_recently_added_first() {
    let db = setup_test_db().await;

    let a = catalog_service::add_book(&db, sample_book("First", "A"))
        .await
        .unwrap();
    let b = catalog_service::add_book(&db, sample_book("Second", "A"))
        .await
        .unwrap();
    let c = catalog_service::add_book(&db, sample_book("Third", "A"))
        .await
        .unwrap();

    let books = catalog_service::list_books(&db, BookFilter::default())
        .await
        .unwrap();
    let ids: Vec<i32> = books.iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);

    // Stable across repeated calls without intervening writes
    let again = catalog_service::list_books(&db, BookFilter::default())
        .await
        .unwrap();
    assert_eq!(again.iter().map(|book| book.id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn shelf_filter_matches_case_insensitive_substring() {
    let db = setup_test_db().await;

    catalog_service::add_book(&db, sample_book("Dune", "Salon-A1"))
        .await
        .unwrap();
    catalog_service::add_book(&db, sample_book("Solaris", "salon-a2"))
        .await
        .unwrap();
    catalog_service::add_book(&db, sample_book("Foundation", "Office-B1"))
        .await
        .unwrap();

    let filter = BookFilter {
        shelf: Some("SALON".to_string()),
        status: None,
    };
    let books = catalog_service::list_books(&db, filter).await.unwrap();
    assert_eq!(books.len(), 2);
    assert!(books
        .iter()
        .all(|b| b.shelf_location.to_lowercase().contains("salon")));
}

#[tokio::test]
async fn status_filter_matches_exact_status() {
    let db = setup_test_db().await;

    catalog_service::add_book(&db, sample_book("Dune", "A"))
        .await
        .unwrap();
    let read = catalog_service::add_book(
        &db,
        NewBook {
            status: ReadingStatus::Read,
            ..sample_book("Solaris", "A")
        },
    )
    .await
    .unwrap();

    let filter = BookFilter {
        shelf: None,
        status: Some(StatusFilter::Status(ReadingStatus::Read)),
    };
    let books = catalog_service::list_books(&db, filter).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, read.id);
}

#[tokio::test]
async fn on_loan_filter_matches_borrower_not_status() {
    let db = setup_test_db().await;

    let lent = catalog_service::add_book(&db, sample_book("Dune", "A"))
        .await
        .unwrap();
    catalog_service::add_book(
        &db,
        NewBook {
            status: ReadingStatus::Read,
            ..sample_book("Solaris", "A")
        },
    )
    .await
    .unwrap();

    // Lend the first book; its status stays to_read
    catalog_service::update_book(&db, lent.id, "Ali", ReadingStatus::ToRead)
        .await
        .unwrap();

    let filter = BookFilter {
        shelf: None,
        status: Some(StatusFilter::OnLoan),
    };
    let books = catalog_service::list_books(&db, filter).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, lent.id);
    assert_eq!(books[0].borrowed_by, "Ali");
    assert!(books[0].is_on_loan());
}

#[tokio::test]
async fn update_sets_and_clears_borrowed_date_with_borrower() {
    let db = setup_test_db().await;

    let book = catalog_service::add_book(&db, sample_book("Dune", "A"))
        .await
        .unwrap();

    let lent = catalog_service::update_book(&db, book.id, "Ali", ReadingStatus::Reading)
        .await
        .unwrap();
    assert_eq!(lent.borrowed_by, "Ali");
    assert_eq!(lent.status, "reading");
    // YYYY-MM-DD HH:MM
    assert_eq!(lent.borrowed_date.len(), 16);

    // Re-lending overwrites the prior borrower, last write wins
    let relent = catalog_service::update_book(&db, book.id, "Veli", ReadingStatus::Reading)
        .await
        .unwrap();
    assert_eq!(relent.borrowed_by, "Veli");
    assert!(!relent.borrowed_date.is_empty());

    let returned = catalog_service::update_book(&db, book.id, "", ReadingStatus::Read)
        .await
        .unwrap();
    assert_eq!(returned.borrowed_by, "");
    assert_eq!(returned.borrowed_date, "");
    assert_eq!(returned.status, "read");
}

#[tokio::test]
async fn update_and_delete_unknown_id_return_not_found() {
    let db = setup_test_db().await;

    catalog_service::add_book(&db, sample_book("Dune", "A"))
        .await
        .unwrap();

    let err = catalog_service::update_book(&db, 999, "Ali", ReadingStatus::Read)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));

    let err = catalog_service::delete_book(&db, 999).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));

    // Catalog unchanged
    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.on_loan, 0);
}

#[tokio::test]
async fn statistics_counts_totals_reads_and_loans() {
    let db = setup_test_db().await;

    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!((stats.total, stats.read, stats.on_loan), (0, 0, 0));

    for i in 0..5 {
        catalog_service::add_book(&db, sample_book(&format!("Book {}", i), "A"))
            .await
            .unwrap();
    }
    let read_one = catalog_service::add_book(
        &db,
        NewBook {
            status: ReadingStatus::Read,
            ..sample_book("Read One", "A")
        },
    )
    .await
    .unwrap();
    let read_two = catalog_service::add_book(
        &db,
        NewBook {
            status: ReadingStatus::Read,
            ..sample_book("Read Two", "A")
        },
    )
    .await
    .unwrap();

    // Lend one of the read books, keeping its status
    catalog_service::update_book(&db, read_two.id, "Ali", ReadingStatus::Read)
        .await
        .unwrap();

    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!(stats.total, 7);
    assert_eq!(stats.read, 2);
    assert_eq!(stats.on_loan, 1);
    assert_ne!(read_one.id, read_two.id);
}

#[tokio::test]
async fn shelf_occupancy_groups_by_shelf() {
    let db = setup_test_db().await;

    catalog_service::add_book(&db, sample_book("A", "Salon-A1"))
        .await
        .unwrap();
    catalog_service::add_book(&db, sample_book("B", "Salon-A1"))
        .await
        .unwrap();
    catalog_service::add_book(&db, sample_book("C", "Office-B1"))
        .await
        .unwrap();

    let shelves = catalog_service::shelf_occupancy(&db).await.unwrap();
    assert_eq!(shelves.len(), 2);
    assert_eq!(shelves[0].name, "Salon-A1");
    assert_eq!(shelves[0].count, 2);
    assert_eq!(shelves[1].name, "Office-B1");
    assert_eq!(shelves[1].count, 1);
}

#[tokio::test]
async fn author_distribution_groups_by_author() {
    let db = setup_test_db().await;

    for title in ["Dune", "Dune Messiah"] {
        catalog_service::add_book(
            &db,
            NewBook {
                author: "Frank Herbert".to_string(),
                ..sample_book(title, "A")
            },
        )
        .await
        .unwrap();
    }
    catalog_service::add_book(
        &db,
        NewBook {
            author: "Stanislaw Lem".to_string(),
            ..sample_book("Solaris", "A")
        },
    )
    .await
    .unwrap();

    let authors = catalog_service::author_distribution(&db).await.unwrap();
    assert_eq!(authors[0].name, "Frank Herbert");
    assert_eq!(authors[0].count, 2);
    assert_eq!(authors[1].name, "Stanislaw Lem");
    assert_eq!(authors[1].count, 1);
}

#[tokio::test]
async fn full_record_lifecycle() {
    let db = setup_test_db().await;

    let book = catalog_service::add_book(
        &db,
        NewBook {
            isbn: "9780000000001".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            shelf_location: "Salon-A1".to_string(),
            cover_url: String::new(),
            status: ReadingStatus::ToRead,
        },
    )
    .await
    .unwrap();
    assert_eq!(book.id, 1);

    let lent = catalog_service::update_book(&db, book.id, "Ali", ReadingStatus::Reading)
        .await
        .unwrap();
    assert_eq!(lent.status, "reading");
    assert!(!lent.borrowed_date.is_empty());

    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!((stats.total, stats.read, stats.on_loan), (1, 0, 1));

    let returned = catalog_service::update_book(&db, book.id, "", ReadingStatus::Reading)
        .await
        .unwrap();
    assert_eq!(returned.borrowed_date, "");

    let stats = catalog_service::statistics(&db).await.unwrap();
    assert_eq!((stats.total, stats.read, stats.on_loan), (1, 0, 0));

    catalog_service::delete_book(&db, book.id).await.unwrap();

    let books = catalog_service::list_books(&db, BookFilter::default())
        .await
        .unwrap();
    assert!(books.is_empty());
}
