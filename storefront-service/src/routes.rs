//! The storefront API route table

use crate::{
    controllers::{AuthAction, OrderAction, ProductAction},
    health,
    routing::{Handler, RouteError, RouteTable},
};

/// Every API route, in lookup order
///
/// Paths are relative to the configured API prefix.
pub fn api_routes() -> Result<RouteTable, RouteError> {
    let mut routes = RouteTable::builder();

    routes.get("/health", Handler::inline(health::health))?;

    // Auth
    routes
        .post("/auth/register", AuthAction::Register)?
        .post("/auth/login", AuthAction::Login)?
        .post("/auth/logout", AuthAction::Logout)?
        .post("/auth/forgot-password", AuthAction::ForgotPassword)?
        .post("/auth/reset-password", AuthAction::ResetPassword)?
        .get("/auth/me", AuthAction::Me)?;

    // Products
    routes
        .get("/products", ProductAction::Index)?
        .get("/products/{slug}", ProductAction::Show)?
        .post("/products", ProductAction::Store)?
        .put("/products/{id}", ProductAction::Update)?
        .delete("/products/{id}", ProductAction::Destroy)?;

    // Categories
    routes
        .get("/categories", ProductAction::Categories)?
        .get("/categories/{slug}", ProductAction::CategoryProducts)?;

    // Orders
    routes
        .get("/orders", OrderAction::Index)?
        .get("/orders/{orderNumber}", OrderAction::Show)?
        .post("/orders", OrderAction::Store)?
        .put("/orders/{id}/status", OrderAction::UpdateStatus)?;

    // Cart
    routes
        .get("/cart", OrderAction::GetCart)?
        .post("/cart/add", OrderAction::AddToCart)?
        .put("/cart/update", OrderAction::UpdateCart)?
        .delete("/cart/remove/{id}", OrderAction::RemoveFromCart)?;

    Ok(routes.build())
}
