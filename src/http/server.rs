//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Combine controller routes with the framework mounts (`/static`, `/backbone-models`)
//! - Wire up middleware (tracing, timeout, request ID)
//! - Answer unmatched requests with 404
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::context::AppContext;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::routing::naming::{CLIENT_MODELS_SEGMENT, STATIC_SEGMENT};

/// HTTP server for a resolved application.
pub struct HttpServer {
    router: Router,
    app: AppContext,
}

impl HttpServer {
    /// `routes` holds the controller bindings, already installed.
    pub fn new(app: AppContext, routes: Router) -> Self {
        let router = Self::build_router(&app, routes);
        Self { router, app }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(app: &AppContext, routes: Router) -> Router {
        let config = app.config();
        let app_dir = app.root().join("app");
        let mut router = routes;

        if config.static_files.serve_static {
            let dir = app_dir.join(STATIC_SEGMENT);
            tracing::debug!(dir = %dir.display(), "Mounting static assets");
            router = router.nest_service(&format!("/{STATIC_SEGMENT}"), ServeDir::new(dir));
        }
        if config.static_files.serve_client_models {
            let dir = app_dir.join(CLIENT_MODELS_SEGMENT);
            tracing::debug!(dir = %dir.display(), "Mounting client models");
            router = router.nest_service(&format!("/{CLIENT_MODELS_SEGMENT}"), ServeDir::new(dir));
        }

        router
            .fallback(not_found)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.app.root().display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No route matched");
    (StatusCode::NOT_FOUND, "Not Found")
}
