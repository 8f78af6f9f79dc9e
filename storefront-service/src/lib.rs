//! # storefront-service
//!
//! JSON API for the Kamran Sports storefront.
//!
//! Requests are matched against an immutable table of path templates
//! (`/products/{slug}`) and dispatched either to an inline handler or to a
//! controller action. Catalog reads go through [`listing::ProductCatalog`],
//! which builds parameterized predicates from query filters, paginates, and
//! runs against any [`persistence::Store`]; production uses PostgreSQL.
//!
//! Every response is an [`responses::Envelope`]:
//! `{success, data?, message?, pagination?}`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use storefront_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::connect(config.clone()).await?;
//!
//!     Server::new(config).serve(app(state)).await
//! }
//! ```

pub mod config;
pub mod controllers;
pub mod database;
pub mod dispatcher;
pub mod error;
pub mod health;
pub mod listing;
pub mod observability;
pub mod persistence;
pub mod responses;
pub mod routes;
pub mod routing;
pub mod server;
pub mod state;

/// Common imports
pub mod prelude {
    pub use crate::config::{CatalogConfig, Config, DatabaseConfig, Environment};
    pub use crate::dispatcher::{ApiRequest, Dispatcher};
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result};
    pub use crate::listing::{FilterSet, PageRequest, PageResult, ProductCatalog};
    pub use crate::observability::init_tracing;
    pub use crate::persistence::{Bindings, PgStore, Record, Store};
    pub use crate::responses::{Envelope, PaginationMeta, Reply};
    pub use crate::routing::{Handler, PathParams, RouteTable, Verb};
    pub use crate::server::{app, Server};
    pub use crate::state::AppState;
}
