//! Named middleware.
//!
//! # Responsibilities
//! - Keep the name → middleware table views refer to
//! - Compose a view's middleware list in front of its action
//!
//! # Design Decisions
//! - Composition happens once at bind time, so aliases share the composed handler
//! - The first listed middleware runs first (outermost)

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};

use super::context::RequestContext;
use super::handler::Handler;

/// A middleware receives the request and the rest of the chain.
///
/// Calling `next(cx)` continues the chain; returning without calling it
/// short-circuits (a redirect, a 401).
pub type Middleware =
    Arc<dyn Fn(RequestContext, Handler) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function into a [`Middleware`].
pub fn middleware<F, Fut, R>(f: F) -> Middleware
where
    F: Fn(RequestContext, Handler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |cx: RequestContext, next: Handler| {
        let fut = f(cx, next);
        async move { fut.await.into_response() }.boxed()
    })
}

/// Compose `chain` in front of `endpoint`, first element outermost.
pub fn compose(chain: Vec<Middleware>, endpoint: Handler) -> Handler {
    chain.into_iter().rev().fold(endpoint, |next, layer| {
        let wrapped: Handler = Arc::new(move |cx: RequestContext| layer(cx, next.clone()));
        wrapped
    })
}

/// Registry of middlewares by name.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    middlewares: HashMap<String, Middleware>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a middleware, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, middleware: Middleware) -> &mut Self {
        self.middlewares.insert(name.into(), middleware);
        self
    }

    /// Builder-style [`MiddlewareRegistry::register`].
    pub fn with(mut self, name: impl Into<String>, middleware: Middleware) -> Self {
        self.register(name, middleware);
        self
    }

    pub fn get(&self, name: &str) -> Option<Middleware> {
        self.middlewares.get(name).cloned()
    }

    /// Resolve every name in order. Returns the first unknown name on failure.
    pub fn resolve<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<Middleware>, &'a str> {
        names
            .into_iter()
            .map(|name| self.get(name).ok_or(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.middlewares.keys().collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry")
            .field("middlewares", &names)
            .finish()
    }
}
