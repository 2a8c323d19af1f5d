//! Service Layer
//!
//! Business logic between the HTTP handlers and the record store.

mod catalog;

pub use catalog::CatalogService;
