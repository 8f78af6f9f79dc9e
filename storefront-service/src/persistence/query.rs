//! Named-parameter queries
//!
//! Queries are written with `:name` placeholders and executed against a
//! [`Bindings`] map. Values never become part of the SQL text; for Postgres
//! the placeholders are rewritten to `$1`, `$2`, ... and bound positionally.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DatabaseError;

/// A value bound to a named parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{:?}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for BindValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parameter name to value, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, BindValue>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `value` under `name`, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<BindValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&BindValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Extend<(String, BindValue)> for Bindings {
    fn extend<I: IntoIterator<Item = (String, BindValue)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// A query with `:name` placeholders rewritten to positional `$n`
///
/// Repeated names share one position. `::type` casts and text inside
/// single- or double-quoted literals are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    sql: String,
    names: Vec<String>,
}

impl NamedQuery {
    pub fn compile(template: &str) -> Self {
        let mut sql = String::with_capacity(template.len());
        let mut names: Vec<String> = Vec::new();
        let mut chars = template.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            match c {
                '\'' | '"' => {
                    sql.push(c);
                    for (_, inner) in chars.by_ref() {
                        sql.push(inner);
                        if inner == c {
                            break;
                        }
                    }
                }
                ':' => match chars.peek() {
                    Some(&(_, ':')) => {
                        chars.next();
                        sql.push_str("::");
                    }
                    Some(&(start, next)) if next.is_ascii_alphabetic() || next == '_' => {
                        let mut end = start;
                        while let Some(&(i, ch)) = chars.peek() {
                            if ch.is_ascii_alphanumeric() || ch == '_' {
                                end = i + ch.len_utf8();
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        let name = &template[start..end];
                        let position = match names.iter().position(|n| n == name) {
                            Some(index) => index + 1,
                            None => {
                                names.push(name.to_string());
                                names.len()
                            }
                        };
                        sql.push('$');
                        sql.push_str(&position.to_string());
                    }
                    _ => sql.push(':'),
                },
                _ => sql.push(c),
            }
        }

        Self { sql, names }
    }

    /// The rewritten SQL
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter names; index `i` is placeholder `$i+1`
    pub fn parameter_names(&self) -> &[String] {
        &self.names
    }

    /// Values in positional order
    ///
    /// Fails if any referenced name is unbound. Extra bindings are ignored.
    pub fn resolve<'b>(&self, bindings: &'b Bindings) -> Result<Vec<&'b BindValue>, DatabaseError> {
        self.names
            .iter()
            .map(|name| {
                bindings
                    .get(name)
                    .ok_or_else(|| DatabaseError::missing_parameter(name))
            })
            .collect()
    }
}
