use crate::{
    error::{Error, Result},
    responses::Reply,
    routing::PathParams,
};

/// Order and cart endpoints; registered but not implemented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Index,
    Show,
    Store,
    UpdateStatus,
    GetCart,
    AddToCart,
    UpdateCart,
    RemoveFromCart,
}

impl OrderAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "OrderController::index",
            Self::Show => "OrderController::show",
            Self::Store => "OrderController::store",
            Self::UpdateStatus => "OrderController::updateStatus",
            Self::GetCart => "OrderController::getCart",
            Self::AddToCart => "OrderController::addToCart",
            Self::UpdateCart => "OrderController::updateCart",
            Self::RemoveFromCart => "OrderController::removeFromCart",
        }
    }

    fn pending_message(&self) -> &'static str {
        match self {
            Self::Index => "Get orders endpoint - coming soon",
            Self::Show => "Get order details endpoint - coming soon",
            Self::Store => "Create order endpoint - coming soon",
            Self::UpdateStatus => "Update order status endpoint - coming soon",
            Self::GetCart => "Get cart endpoint - coming soon",
            Self::AddToCart => "Add to cart endpoint - coming soon",
            Self::UpdateCart => "Update cart endpoint - coming soon",
            Self::RemoveFromCart => "Remove from cart endpoint - coming soon",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OrderController;

impl OrderController {
    pub fn handle(&self, action: OrderAction, params: PathParams) -> Result<Reply> {
        tracing::debug!(action = action.name(), params = params.len(), "Order endpoint pending");
        Err(Error::NotImplemented(action.pending_message().to_string()))
    }
}
