use crate::routing::QueryMap;

/// Optional constraints on a product listing
///
/// Each field is independent; `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    /// Category slug
    pub category: Option<String>,
    /// Brand slug
    pub brand: Option<String>,
    /// Free-text term matched against name and description
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl FilterSet {
    /// Decode `category`, `brand`, `search`, `min_price` and `max_price`
    ///
    /// Blank text values and prices that are not finite numbers are
    /// treated as absent.
    pub fn from_query(query: &QueryMap) -> Self {
        Self {
            category: text(query, "category"),
            brand: text(query, "brand"),
            search: text(query, "search"),
            min_price: price(query, "min_price"),
            max_price: price(query, "max_price"),
        }
    }

    /// Pin the category, replacing any requested one
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn text(query: &QueryMap, key: &str) -> Option<String> {
    query
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn price(query: &QueryMap, key: &str) -> Option<f64> {
    query
        .get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
