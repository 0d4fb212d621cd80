//! Axum dispatcher.
//!
//! # Responsibilities
//! - Receive route bindings in table order
//! - Translate engine patterns into axum paths
//! - Apply first-registration-wins on collisions
//! - Hand each request to its handler with an explicit `RequestContext`
//!
//! # Design Decisions
//! - `:name` becomes `{name}`; a trailing `/?` registers both slash variants
//! - Collisions compare path *shapes* (parameter names ignored), because axum
//!   can't hold `/{id}` and `/{slug}` side by side
//! - Skipped bindings are logged and counted, never fatal

use std::collections::{HashMap, HashSet};

use axum::body::Body;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::RawPathParams;
use axum::http::Request;
use axum::response::Response;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use futures_util::future::BoxFuture;

use super::context::{AppContext, PathParams, RequestContext};
use super::handler::Handler;
use crate::observability::metrics;
use crate::routing::grammar::OPTIONAL_SLASH;
use crate::routing::{Dispatcher, Verb};

/// Collects bindings into an axum [`Router`].
pub struct AxumDispatcher {
    app: AppContext,
    /// Method routers per axum path, in first-registration order.
    paths: Vec<(String, MethodRouter)>,
    path_index: HashMap<String, usize>,
    /// Path shape → first concrete axum path registered with that shape.
    shapes: HashMap<String, String>,
    bound: HashSet<(Verb, String)>,
    skipped: usize,
}

impl AxumDispatcher {
    pub fn new(app: AppContext) -> Self {
        Self {
            app,
            paths: Vec::new(),
            path_index: HashMap::new(),
            shapes: HashMap::new(),
            bound: HashSet::new(),
            skipped: 0,
        }
    }

    /// Number of bindings dropped because an earlier one already held the route.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Build the router holding every accepted binding.
    pub fn into_router(self) -> Router {
        self.paths
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            })
    }

    fn bind_path(&mut self, verb: Verb, path: String, handler: Handler) {
        let shape = path_shape(&path);
        if let Some(existing) = self.shapes.get(&shape) {
            if *existing != path {
                self.skip(verb, &path, "parameter names differ from an earlier route");
                return;
            }
        }
        if !self.bound.insert((verb, shape.clone())) {
            self.skip(verb, &path, "already bound");
            return;
        }
        self.shapes.entry(shape).or_insert_with(|| path.clone());

        let endpoint = endpoint(self.app.clone(), verb, handler);
        match self.path_index.get(&path) {
            Some(&i) => {
                let (_, existing) = &mut self.paths[i];
                *existing = existing.clone().on(method_filter(verb), endpoint);
            }
            None => {
                self.path_index.insert(path.clone(), self.paths.len());
                self.paths.push((path, on(method_filter(verb), endpoint)));
            }
        }
        metrics::record_route_bound(verb);
    }

    fn skip(&mut self, verb: Verb, path: &str, reason: &str) {
        self.skipped += 1;
        metrics::record_binding_skipped();
        tracing::warn!(verb = %verb, path = %path, reason, "Route binding skipped");
    }
}

impl Dispatcher for AxumDispatcher {
    fn bind(&mut self, verb: Verb, pattern: &str, handler: Handler) {
        for path in axum_paths(pattern) {
            self.bind_path(verb, path, handler.clone());
        }
    }
}

/// Adapt a [`Handler`] to an axum handler that extracts the raw path params.
fn endpoint(
    app: AppContext,
    verb: Verb,
    handler: Handler,
) -> impl FnOnce(
    Result<RawPathParams, RawPathParamsRejection>,
    Request<Body>,
) -> BoxFuture<'static, Response>
       + Clone
       + Send
       + Sync
       + 'static {
    move |params: Result<RawPathParams, RawPathParamsRejection>, request: Request<Body>| {
        let params: PathParams = match &params {
            Ok(raw) => raw.iter().collect(),
            Err(_) => PathParams::default(),
        };
        metrics::record_request(verb);
        handler(RequestContext::new(app, params, request))
    }
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Put => MethodFilter::PUT,
        Verb::Delete => MethodFilter::DELETE,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Head => MethodFilter::HEAD,
        Verb::Options => MethodFilter::OPTIONS,
    }
}

/// Expand an engine pattern into the axum paths it stands for.
pub fn axum_paths(pattern: &str) -> Vec<String> {
    let (base, optional_slash) = match pattern.strip_suffix(OPTIONAL_SLASH) {
        Some(base) if !base.is_empty() => (base, true),
        _ => (pattern, false),
    };

    let converted: String = base
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/");

    if optional_slash {
        vec![converted.clone(), format!("{converted}/")]
    } else {
        vec![converted]
    }
}

/// `/users/{id}` and `/users/{slug}` share the shape `/users/{}`.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
