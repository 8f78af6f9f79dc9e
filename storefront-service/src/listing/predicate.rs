//! WHERE-clause construction for product listings
//!
//! The output is an explicit list of clauses plus the values they bind,
//! not a finished SQL string. Clause order is fixed: baseline, category,
//! brand, search, min price, max price.

use std::fmt;

use super::FilterSet;
use crate::persistence::{BindValue, Bindings};

/// Clause every listing carries: only active products are visible
pub const ACTIVE_PRODUCT: &str = "p.is_active = TRUE";

/// Comparison used by a single-column clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    AtLeast,
    AtMost,
    /// Case-insensitive pattern match
    Like,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::AtLeast => write!(f, ">="),
            Self::AtMost => write!(f, "<="),
            Self::Like => write!(f, "ILIKE"),
        }
    }
}

/// Conjunction of clauses and the parameters they reference
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    bindings: Bindings,
}

impl Predicate {
    /// Just the baseline clause
    pub fn baseline() -> Self {
        Self {
            clauses: vec![ACTIVE_PRODUCT.to_string()],
            bindings: Bindings::new(),
        }
    }

    /// Build the predicate for a filter set
    pub fn from_filters(filters: &FilterSet) -> Self {
        let mut predicate = Self::baseline();

        if let Some(ref category) = filters.category {
            predicate.compare("c.slug", Comparison::Equal, "category", category.as_str());
        }
        if let Some(ref brand) = filters.brand {
            predicate.compare("b.slug", Comparison::Equal, "brand", brand.as_str());
        }
        if let Some(ref term) = filters.search {
            predicate.push(
                format!(
                    "(p.name {like} :search OR p.description {like} :search)",
                    like = Comparison::Like
                ),
                "search",
                format!("%{}%", term),
            );
        }
        if let Some(min) = filters.min_price {
            predicate.compare("p.base_price", Comparison::AtLeast, "min_price", min);
        }
        if let Some(max) = filters.max_price {
            predicate.compare("p.base_price", Comparison::AtMost, "max_price", max);
        }

        predicate
    }

    fn compare(
        &mut self,
        column: &str,
        comparison: Comparison,
        param: &str,
        value: impl Into<BindValue>,
    ) {
        self.push(format!("{} {} :{}", column, comparison, param), param, value);
    }

    fn push(&mut self, clause: String, param: &str, value: impl Into<BindValue>) {
        self.clauses.push(clause);
        self.bindings.insert(param, value);
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Clauses joined with `AND`, ready to follow `WHERE`
    pub fn where_sql(&self) -> String {
        self.clauses.join(" AND ")
    }
}
