//! Handler context.
//!
//! # Responsibilities
//! - Carry application-scoped state (root path, configuration) to handlers
//! - Carry request-scoped state (path parameters, request) to handlers
//!
//! # Design Decisions
//! - Handlers receive everything explicitly; there is no global framework instance
//! - `AppContext` is cheap to clone (one `Arc`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::config::FrameworkConfig;

/// Application-scoped context shared by every handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    inner: Arc<AppContextInner>,
}

#[derive(Debug)]
struct AppContextInner {
    root: PathBuf,
    config: FrameworkConfig,
}

impl AppContext {
    pub fn new(root: impl Into<PathBuf>, config: FrameworkConfig) -> Self {
        Self {
            inner: Arc::new(AppContextInner {
                root: root.into(),
                config,
            }),
        }
    }

    /// Application root directory (the one holding `app/`).
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.inner.config
    }
}

/// Named path parameters captured by the matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Everything a handler gets for one request.
#[derive(Debug)]
pub struct RequestContext {
    pub app: AppContext,
    pub params: PathParams,
    pub request: Request<Body>,
}

impl RequestContext {
    pub fn new(app: AppContext, params: PathParams, request: Request<Body>) -> Self {
        Self {
            app,
            params,
            request,
        }
    }

    /// Shorthand for `self.params.get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_params_lookup() {
        let params: PathParams = [("id", "42"), ("slug", "hello")].into_iter().collect();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_app_context_is_shared() {
        let ctx = AppContext::new("/srv/app", FrameworkConfig::default());
        let clone = ctx.clone();
        assert!(Arc::ptr_eq(&ctx.inner, &clone.inner));
        assert_eq!(clone.root(), Path::new("/srv/app"));
    }
}
