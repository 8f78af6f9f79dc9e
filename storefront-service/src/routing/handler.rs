use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::PathParams;
use crate::{controllers::Action, error::Result, responses::Reply};

/// Future returned by an inline handler
pub type HandlerFuture = BoxFuture<'static, Result<Reply>>;

type InlineFn = dyn Fn(PathParams) -> HandlerFuture + Send + Sync;

/// What a route resolves to
///
/// Either a closure invoked with the captured parameters, or a controller
/// action from the closed [`Action`] set. Actions are resolved when the
/// route is registered, never by name at request time.
#[derive(Clone)]
pub enum Handler {
    Inline(Arc<InlineFn>),
    Action(Action),
}

impl Handler {
    /// Wrap an async function or closure taking the path parameters
    pub fn inline<F, Fut>(f: F) -> Self
    where
        F: Fn(PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply>> + Send + 'static,
    {
        Handler::Inline(Arc::new(move |params| f(params).boxed()))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Inline(_) => f.write_str("Inline(..)"),
            Handler::Action(action) => f.debug_tuple("Action").field(action).finish(),
        }
    }
}

impl From<Action> for Handler {
    fn from(action: Action) -> Self {
        Handler::Action(action)
    }
}
