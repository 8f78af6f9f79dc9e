use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::{FilterSet, PageRequest, Predicate};
use crate::{
    config::CatalogConfig,
    error::{DatabaseError, Result},
    persistence::{BindValue, Bindings, Record, Store},
    responses::PaginationMeta,
};

const PRODUCT_JOINS: &str = "FROM products p \
     LEFT JOIN categories c ON p.category_id = c.id \
     LEFT JOIN brands b ON p.brand_id = b.id";

const LISTING_COLUMNS: &str = "p.*, \
     c.name AS category_name, \
     c.slug AS category_slug, \
     b.name AS brand_name, \
     b.slug AS brand_slug, \
     (SELECT pi.image_url FROM product_images pi \
        WHERE pi.product_id = p.id AND pi.is_primary = TRUE LIMIT 1) AS primary_image, \
     (SELECT AVG(pr.rating)::float8 FROM product_reviews pr \
        WHERE pr.product_id = p.id AND pr.is_approved = TRUE) AS avg_rating, \
     (SELECT COUNT(*) FROM product_reviews pr \
        WHERE pr.product_id = p.id AND pr.is_approved = TRUE) AS review_count";

const PRODUCT_BY_SLUG: &str = "SELECT p.*, \
     c.name AS category_name, \
     c.slug AS category_slug, \
     b.name AS brand_name, \
     b.slug AS brand_slug, \
     b.logo_url AS brand_logo \
     FROM products p \
     LEFT JOIN categories c ON p.category_id = c.id \
     LEFT JOIN brands b ON p.brand_id = b.id \
     WHERE p.slug = :slug AND p.is_active = TRUE";

const PRODUCT_IMAGES: &str = "SELECT * FROM product_images \
     WHERE product_id = :product_id \
     ORDER BY display_order, is_primary DESC";

const PRODUCT_VARIANTS: &str = "SELECT * FROM product_variants \
     WHERE product_id = :product_id AND is_active = TRUE \
     ORDER BY name";

const PRODUCT_REVIEWS: &str = "SELECT pr.*, u.full_name AS user_name \
     FROM product_reviews pr \
     JOIN users u ON pr.user_id = u.id \
     WHERE pr.product_id = :product_id AND pr.is_approved = TRUE \
     ORDER BY pr.created_at DESC, pr.id DESC \
     LIMIT :review_limit";

const ACTIVE_CATEGORIES: &str = "SELECT c.*, COUNT(p.id) AS product_count \
     FROM categories c \
     LEFT JOIN products p ON c.id = p.category_id AND p.is_active = TRUE \
     WHERE c.is_active = TRUE \
     GROUP BY c.id \
     ORDER BY c.display_order, c.name";

const CATEGORY_BY_SLUG: &str = "SELECT c.* FROM categories c \
     WHERE c.slug = :slug AND c.is_active = TRUE";

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<Record>,
    /// Matching records across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub page_count: u64,
}

impl PageResult {
    pub fn pagination(&self) -> PaginationMeta {
        PaginationMeta {
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.page_count,
        }
    }
}

/// Read-side product catalog over a [`Store`]
///
/// The count and the page are two independent queries; under concurrent
/// writes `total` and `items` may come from different snapshots.
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn Store>,
    settings: CatalogConfig,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn Store>, settings: CatalogConfig) -> Self {
        Self { store, settings }
    }

    /// Active products matching `filters`, newest first
    ///
    /// Each item carries `primary_image`, `avg_rating` and `review_count`
    /// alongside its category and brand names.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filters: &FilterSet,
        request: &PageRequest,
    ) -> Result<PageResult> {
        let predicate = Predicate::from_filters(filters);
        let window = request.resolve(self.settings.default_page_size, self.settings.max_page_size);
        let where_sql = predicate.where_sql();

        let count_sql = format!("SELECT COUNT(*) AS total {} WHERE {}", PRODUCT_JOINS, where_sql);
        let total = match self.store.fetch_one(&count_sql, predicate.bindings()).await? {
            Some(row) => read_total(&row)?,
            None => 0,
        };

        let select_sql = format!(
            "SELECT {} {} WHERE {} ORDER BY p.created_at DESC, p.id DESC LIMIT :limit OFFSET :offset",
            LISTING_COLUMNS, PRODUCT_JOINS, where_sql
        );
        let bindings = predicate
            .bindings()
            .clone()
            .with("limit", window.limit)
            .with("offset", i64::try_from(window.offset).unwrap_or(i64::MAX));
        let items = self.store.fetch_all(&select_sql, &bindings).await?;

        tracing::debug!(total, returned = items.len(), page = window.page, "Listed products");

        Ok(PageResult {
            items,
            total,
            page: window.page,
            limit: window.limit,
            page_count: super::page_count(total, window.limit),
        })
    }

    /// A single active product with its images, variants and latest reviews
    ///
    /// `Ok(None)` when no active product has this slug. `variants` is only
    /// present for products flagged `has_variants`.
    #[instrument(skip(self))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Record>> {
        let bindings = Bindings::new().with("slug", slug);
        let Some(mut product) = self.store.fetch_one(PRODUCT_BY_SLUG, &bindings).await? else {
            return Ok(None);
        };

        let by_product = Bindings::new().with("product_id", record_id(&product)?);

        let images = self.store.fetch_all(PRODUCT_IMAGES, &by_product).await?;
        product.insert("images".into(), into_array(images));

        if is_truthy(product.get("has_variants")) {
            let variants = self.store.fetch_all(PRODUCT_VARIANTS, &by_product).await?;
            product.insert("variants".into(), into_array(variants));
        }

        let reviews = by_product.with("review_limit", self.settings.review_limit);
        let reviews = self.store.fetch_all(PRODUCT_REVIEWS, &reviews).await?;
        product.insert("reviews".into(), into_array(reviews));

        Ok(Some(product))
    }

    /// Active categories with their count of active products
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Record>> {
        self.store.fetch_all(ACTIVE_CATEGORIES, &Bindings::new()).await
    }

    /// An active category and one page of its products
    ///
    /// `Ok(None)` when the category is missing or inactive. Other filters
    /// still apply; any requested category is replaced by `slug`.
    #[instrument(skip(self))]
    pub async fn list_category_products(
        &self,
        slug: &str,
        filters: &FilterSet,
        request: &PageRequest,
    ) -> Result<Option<(Record, PageResult)>> {
        let bindings = Bindings::new().with("slug", slug);
        let Some(category) = self.store.fetch_one(CATEGORY_BY_SLUG, &bindings).await? else {
            return Ok(None);
        };

        let filters = filters.clone().with_category(slug);
        let page = self.list_products(&filters, request).await?;
        Ok(Some((category, page)))
    }
}

fn read_total(row: &Record) -> Result<u64> {
    match row.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| DatabaseError::decode("count query returned no usable `total`").into())
}

fn record_id(record: &Record) -> Result<BindValue> {
    match record.get("id") {
        Some(Value::Number(n)) => n.as_i64().map(BindValue::Int),
        Some(Value::String(s)) => Some(BindValue::Text(s.clone())),
        _ => None,
    }
    .ok_or_else(|| DatabaseError::decode("record has no usable `id`").into())
}

/// Loose boolean reading of a column that may be `bool`, `0/1` or text
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !matches!(s.as_str(), "" | "0" | "false" | "f"),
        _ => false,
    }
}

fn into_array(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}
