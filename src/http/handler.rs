//! Request handlers.
//!
//! # Responsibilities
//! - Define the type-erased handler every route binding points at
//! - Wrap async functions into handlers
//! - Build static-file handlers for template views
//! - Keep named actions for manifest-defined controllers

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::context::RequestContext;

/// A shareable request handler.
///
/// Aliases of one view point at the same `Arc`, so `Arc::ptr_eq` tells whether
/// two bindings reach the same logical route.
pub type Handler = Arc<dyn Fn(RequestContext) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function into a [`Handler`].
pub fn handler<F, Fut, R>(f: F) -> Handler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |cx: RequestContext| {
        let fut = f(cx);
        async move { fut.await.into_response() }.boxed()
    })
}

/// A handler that serves `path` verbatim, whatever the verb of its route.
pub fn static_file(path: impl Into<PathBuf>) -> Handler {
    let path = path.into();
    Arc::new(move |cx: RequestContext| {
        let path = path.clone();
        async move {
            let mut request = cx.request;
            if request.method() != Method::HEAD {
                *request.method_mut() = Method::GET;
            }
            tracing::trace!(file = %path.display(), "Serving static view");
            match ServeFile::new(&path).oneshot(request).await {
                Ok(response) => response.map(Body::new),
                Err(never) => match never {},
            }
        }
        .boxed()
    })
}

/// Named actions that controller manifests can reference.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Handler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, action: Handler) -> &mut Self {
        self.actions.insert(name.into(), action);
        self
    }

    /// Builder-style [`ActionRegistry::register`].
    pub fn with(mut self, name: impl Into<String>, action: Handler) -> Self {
        self.register(name, action);
        self
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.actions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}
