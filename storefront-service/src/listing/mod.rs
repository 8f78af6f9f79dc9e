//! Filtered, paginated product listing
//!
//! [`FilterSet`] and [`PageRequest`] are decoded per request,
//! [`Predicate`] turns filters into bound clauses, and [`ProductCatalog`]
//! runs the count and selection queries.

mod filter;
pub mod pagination;
mod predicate;
mod service;

pub use filter::FilterSet;
pub use pagination::{compute, page_count, PageRequest, PageWindow};
pub use predicate::{Comparison, Predicate, ACTIVE_PRODUCT};
pub use service::{PageResult, ProductCatalog};
