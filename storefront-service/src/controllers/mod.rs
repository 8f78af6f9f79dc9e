//! Controller actions
//!
//! Every controller-backed route names one variant of [`Action`]. The
//! dispatcher builds a fresh controller for each request and hands it the
//! action plus the captured path parameters.

mod auth;
mod orders;
mod products;

pub use auth::{AuthAction, AuthController};
pub use orders::{OrderAction, OrderController};
pub use products::{ProductAction, ProductController};

use crate::{
    error::Result,
    responses::Reply,
    routing::{Handler, PathParams, QueryMap},
    state::AppState,
};

/// The closed set of controller actions a route can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Product(ProductAction),
    Auth(AuthAction),
    Order(OrderAction),
}

impl Action {
    /// `Controller::action` label used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Product(a) => a.name(),
            Action::Auth(a) => a.name(),
            Action::Order(a) => a.name(),
        }
    }

    /// Construct the owning controller and run the action
    pub async fn invoke(self, state: &AppState, query: &QueryMap, params: PathParams) -> Result<Reply> {
        match self {
            Action::Product(action) => {
                ProductController::new(state, query)
                    .handle(action, params)
                    .await
            }
            Action::Auth(action) => AuthController.handle(action, params),
            Action::Order(action) => OrderController.handle(action, params),
        }
    }
}

impl From<ProductAction> for Action {
    fn from(action: ProductAction) -> Self {
        Action::Product(action)
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<OrderAction> for Action {
    fn from(action: OrderAction) -> Self {
        Action::Order(action)
    }
}

impl From<ProductAction> for Handler {
    fn from(action: ProductAction) -> Self {
        Handler::Action(action.into())
    }
}

impl From<AuthAction> for Handler {
    fn from(action: AuthAction) -> Self {
        Handler::Action(action.into())
    }
}

impl From<OrderAction> for Handler {
    fn from(action: OrderAction) -> Self {
        Handler::Action(action.into())
    }
}
