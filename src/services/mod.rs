//! Services Layer
//!
//! Pure business logic without the HTTP layer. Every operation takes the
//! store handle explicitly; there is no process-wide connection state.

pub mod catalog_service;

pub use catalog_service::*;
