use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::domain::CatalogError;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Base URL of the Open Library API. Overridable via OPENLIBRARY_URL,
/// which tests point at a local mock server.
pub fn base_url_from_env() -> String {
    env::var("OPENLIBRARY_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// The three fields an ISBN lookup can prefill on the add form.
/// Empty strings mean "nothing returned, fill in manually".
#[derive(Debug, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub cover_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryResponse {
    #[serde(flatten)]
    books: HashMap<String, OpenLibraryBook>,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryBook {
    title: String,
    authors: Option<Vec<OpenLibraryAuthor>>,
    cover: Option<OpenLibraryCover>,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryCover {
    medium: Option<String>,
    large: Option<String>,
}

/// Fetch book metadata for an ISBN from Open Library.
///
/// One outbound GET with a short timeout. Any transport, HTTP or parse
/// failure yields `Lookup`; an ISBN absent from the response yields
/// `NotFound`. Either way the caller proceeds with manual entry.
pub async fn fetch_book_metadata(
    base_url: &str,
    isbn: &str,
) -> Result<BookMetadata, CatalogError> {
    let url = format!(
        "{}/api/books?bibkeys=ISBN:{}&format=json&jscmd=data",
        base_url,
        urlencoding::encode(isbn)
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| CatalogError::Lookup(e.to_string()))?;

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| CatalogError::Lookup(format!("Failed to send request: {}", e)))?;

    if !resp.status().is_success() {
        return Err(CatalogError::Lookup(format!(
            "Open Library API returned status: {}",
            resp.status()
        )));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| CatalogError::Lookup(format!("Failed to read response body: {}", e)))?;

    let parsed: OpenLibraryResponse = serde_json::from_str(&body)
        .map_err(|e| CatalogError::Lookup(format!("Failed to parse JSON: {}", e)))?;

    let key = format!("ISBN:{}", isbn);
    let book = parsed.books.get(&key).ok_or(CatalogError::NotFound)?;

    let author = book
        .authors
        .as_ref()
        .map(|authors| {
            authors
                .iter()
                .map(|a| a.name.clone())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    // Medium covers render better on the add form; fall back to large
    let cover_url = book
        .cover
        .as_ref()
        .and_then(|c| c.medium.clone().or_else(|| c.large.clone()))
        .unwrap_or_default();

    Ok(BookMetadata {
        title: book.title.clone(),
        author,
        cover_url,
    })
}
