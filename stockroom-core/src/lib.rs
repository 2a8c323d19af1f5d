//! Stockroom Core - Domain Types
//!
//! Records, identifiers and pure projections for the component library and
//! product catalog. No I/O lives here; storage and HTTP crates depend on it.

pub mod coerce;
pub mod dates;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod projection;

pub use entities::{
    trimmed_metadata, Component, ComponentEntry, ComponentFields, ComponentInput, Product,
    ProductDraft,
};
pub use enums::Category;
pub use error::{
    IdentifierError, RecordKind, StockroomError, StorageError, StorageResult,
    ValidationError,
};
pub use identity::{ComponentId, EntryId, ProductId, RecordId, RecordIdType, RECORD_ID_HEX_LEN};
pub use projection::{
    apply_product_update, filter_components, group_by_category, remove_product, CatalogSummary,
    CategoryCount, CategoryView, LOW_STOCK_THRESHOLD,
};
