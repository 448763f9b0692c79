//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum CatalogError {
    /// Required field missing or malformed on input
    Validation(String),
    /// No record with the given id
    NotFound,
    /// Backing store unreachable or rejected the operation
    Unavailable(String),
    /// Metadata lookup collaborator failed (non-fatal, caller falls
    /// back to manual entry)
    Lookup(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Validation(msg) => write!(f, "Validation error: {}", msg),
            CatalogError::NotFound => write!(f, "Record not found"),
            CatalogError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            CatalogError::Lookup(msg) => write!(f, "Lookup error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

// Persistence failures surface as Unavailable, never as a panic
impl From<sea_orm::DbErr> for CatalogError {
    fn from(e: sea_orm::DbErr) -> Self {
        CatalogError::Unavailable(e.to_string())
    }
}
