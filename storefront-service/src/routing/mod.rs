//! Path-template routing
//!
//! Routes are `(verb, template, handler)` triples kept in registration
//! order. A template such as `/products/{slug}` is compiled once into an
//! anchored matcher; each `{name}` placeholder captures one or more
//! non-slash characters.
//!
//! ```rust
//! use storefront_service::routing::{PathTemplate, Verb};
//!
//! let template = PathTemplate::compile("/products/{slug}").unwrap();
//! let params = template.captures("/products/air-max-90").unwrap();
//! assert_eq!(params.get("slug"), Some("air-max-90"));
//! assert!(template.captures("/products/air-max-90/reviews").is_none());
//!
//! assert_eq!("get".parse::<Verb>().unwrap(), Verb::Get);
//! ```

mod handler;
mod table;
mod template;

pub use handler::{Handler, HandlerFuture};
pub use table::{RouteMatch, RouteTable, RouteTableBuilder};
pub use template::{PathTemplate, RouteError};

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Decoded query-string parameters of a request
pub type QueryMap = HashMap<String, String>;

/// HTTP verbs a route can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = RouteError;

    /// Case-insensitive: `get`, `Get` and `GET` are all [`Verb::Get`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(RouteError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Placeholder values captured from a matched path, keyed by placeholder name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value captured for `name`, if the template declared it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
