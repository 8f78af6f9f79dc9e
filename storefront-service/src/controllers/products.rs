use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    listing::{FilterSet, PageRequest, ProductCatalog},
    responses::Reply,
    routing::{PathParams, QueryMap},
    state::AppState,
};

const PRODUCT_NOT_FOUND: &str = "Product not found";
const CATEGORY_NOT_FOUND: &str = "Category not found";
const NOT_IMPLEMENTED: &str = "Not implemented yet";

/// Catalog endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// Filtered, paginated listing
    Index,
    /// One product by `{slug}`
    Show,
    /// Active categories with product counts
    Categories,
    /// Listing constrained to the category in `{slug}`
    CategoryProducts,
    Store,
    Update,
    Destroy,
}

impl ProductAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "ProductController::index",
            Self::Show => "ProductController::show",
            Self::Categories => "ProductController::categories",
            Self::CategoryProducts => "ProductController::categoryProducts",
            Self::Store => "ProductController::store",
            Self::Update => "ProductController::update",
            Self::Destroy => "ProductController::destroy",
        }
    }
}

/// Per-request controller over the product catalog
pub struct ProductController<'a> {
    catalog: ProductCatalog,
    query: &'a QueryMap,
}

impl<'a> ProductController<'a> {
    pub fn new(state: &AppState, query: &'a QueryMap) -> Self {
        Self {
            catalog: state.catalog(),
            query,
        }
    }

    pub async fn handle(&self, action: ProductAction, params: PathParams) -> Result<Reply> {
        match action {
            ProductAction::Index => self.index().await,
            ProductAction::Show => self.show(&params).await,
            ProductAction::Categories => self.categories().await,
            ProductAction::CategoryProducts => self.category_products(&params).await,
            ProductAction::Store | ProductAction::Update | ProductAction::Destroy => {
                Err(Error::NotImplemented(NOT_IMPLEMENTED.to_string()))
            }
        }
    }

    #[instrument(skip_all)]
    async fn index(&self) -> Result<Reply> {
        let filters = FilterSet::from_query(self.query);
        let request = PageRequest::from_query(self.query);

        let page = self.catalog.list_products(&filters, &request).await?;
        let pagination = page.pagination();
        Ok(Reply::paginated(records(page.items), pagination))
    }

    #[instrument(skip_all, fields(slug))]
    async fn show(&self, params: &PathParams) -> Result<Reply> {
        let slug = required(params, "slug")?;
        tracing::Span::current().record("slug", slug);

        match self.catalog.get_product_by_slug(slug).await? {
            Some(product) => Ok(Reply::ok(Value::Object(product))),
            None => Err(Error::NotFound(PRODUCT_NOT_FOUND.to_string())),
        }
    }

    async fn categories(&self) -> Result<Reply> {
        let categories = self.catalog.list_categories().await?;
        Ok(Reply::ok(records(categories)))
    }

    #[instrument(skip_all, fields(slug))]
    async fn category_products(&self, params: &PathParams) -> Result<Reply> {
        let slug = required(params, "slug")?;
        tracing::Span::current().record("slug", slug);

        let filters = FilterSet::from_query(self.query);
        let request = PageRequest::from_query(self.query);

        let Some((category, page)) = self
            .catalog
            .list_category_products(slug, &filters, &request)
            .await?
        else {
            return Err(Error::NotFound(CATEGORY_NOT_FOUND.to_string()));
        };

        let pagination = page.pagination();
        let data = json!({
            "category": category,
            "products": records(page.items),
        });
        Ok(Reply::paginated(data, pagination))
    }
}

fn required<'p>(params: &'p PathParams, name: &str) -> Result<&'p str> {
    params
        .get(name)
        .ok_or_else(|| Error::Internal(format!("route does not capture `{{{}}}`", name)))
}

fn records(items: Vec<crate::persistence::Record>) -> Value {
    Value::Array(items.into_iter().map(Value::Object).collect())
}
