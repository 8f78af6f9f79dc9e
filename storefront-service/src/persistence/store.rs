use async_trait::async_trait;
use serde_json::{Map, Value};

use super::Bindings;
use crate::error::Result;

/// A row returned by the store, as a JSON object
pub type Record = Map<String, Value>;

/// Parameterized query execution
///
/// Queries use `:name` placeholders resolved against `bindings`; values are
/// always sent as bound parameters.
#[async_trait]
pub trait Store: Send + Sync {
    /// First row of the result, or `None` when the query returns nothing
    async fn fetch_one(&self, query: &str, bindings: &Bindings) -> Result<Option<Record>>;

    /// All rows of the result, in the order the query produces them
    async fn fetch_all(&self, query: &str, bindings: &Bindings) -> Result<Vec<Record>>;
}
