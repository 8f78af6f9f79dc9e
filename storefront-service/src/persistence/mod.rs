//! Persistence collaborator
//!
//! The catalog talks to storage only through [`Store`]: a query template
//! with `:name` placeholders plus a [`Bindings`] map in, JSON records out.

mod postgres;
mod query;
mod store;

#[cfg(test)]
pub(crate) mod recording;

pub use postgres::PgStore;
pub use query::{BindValue, Bindings, NamedQuery};
pub use store::{Record, Store};
