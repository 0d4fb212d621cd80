//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Resolve the controller tree into a route table
//! - Install the table into the HTTP layer
//! - Bind the listener last (traffic only when ready)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and nothing is served
//! - Steps run in order, not concurrently

use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::validation::validate_config;
use crate::config::{load_app_config, ConfigError, FrameworkConfig};
use crate::controller::{ControllerLoader, ManifestLoader};
use crate::http::{ActionRegistry, AppContext, AxumDispatcher, HttpServer, MiddlewareRegistry};
use crate::routing::{resolve_routes, RouteError, RouteTable};

/// Error type for application startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Route resolution failed: {0}")]
    Routes(#[from] RouteError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

type BoxedLoader = Box<dyn ControllerLoader + Send + Sync>;

/// Collects what an application is made of before it starts.
pub struct ApplicationBuilder {
    root: PathBuf,
    config: Option<FrameworkConfig>,
    loader: Option<BoxedLoader>,
    actions: ActionRegistry,
    middlewares: MiddlewareRegistry,
}

impl ApplicationBuilder {
    /// Use `config` instead of reading `app/config` from disk. It is
    /// validated the same way at [`build`](Self::build).
    pub fn config(mut self, config: FrameworkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load controllers with `loader`. Defaults to a [`ManifestLoader`] over
    /// the registered actions.
    pub fn loader<L: ControllerLoader + Send + Sync + 'static>(mut self, loader: L) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    pub fn middlewares(mut self, middlewares: MiddlewareRegistry) -> Self {
        self.middlewares = middlewares;
        self
    }

    /// Load config, resolve every controller and install the routes.
    pub fn build(self) -> Result<Application, StartupError> {
        let config = match self.config {
            Some(config) => {
                validate_config(&config).map_err(ConfigError::Validation)?;
                config
            }
            None => load_app_config(&self.root)?,
        };
        tracing::info!(
            root = %self.root.display(),
            environment = %config.environment,
            main_controller = %config.routes.main_controller,
            "Configuration loaded"
        );
        if !config.routes.allow_rest {
            tracing::debug!("REST data endpoint disabled");
        }

        let loader = self
            .loader
            .unwrap_or_else(|| Box::new(ManifestLoader::new(self.actions)));
        let routes = resolve_routes(&self.root, &config.routes, &*loader, &self.middlewares)?;

        let app = AppContext::new(self.root, config);
        let mut dispatcher = AxumDispatcher::new(app.clone());
        routes.install(&mut dispatcher);
        tracing::info!(
            routes = routes.len(),
            skipped = dispatcher.skipped(),
            "Routes installed"
        );

        let server = HttpServer::new(app, dispatcher.into_router());
        Ok(Application { server, routes })
    }
}

/// A resolved application, ready to serve.
pub struct Application {
    server: HttpServer,
    routes: RouteTable,
}

impl Application {
    /// Start describing the application rooted at `root` (the directory holding `app/`).
    pub fn builder(root: impl Into<PathBuf>) -> ApplicationBuilder {
        ApplicationBuilder {
            root: root.into(),
            config: None,
            loader: None,
            actions: ActionRegistry::new(),
            middlewares: MiddlewareRegistry::new(),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn context(&self) -> &AppContext {
        self.server.app()
    }

    /// The layered router, for in-process use.
    pub fn router(&self) -> axum::Router {
        self.server.router()
    }

    /// Bind `address`, or `server.bind_address` when `None`.
    pub async fn bind(&self, address: Option<&str>) -> Result<TcpListener, StartupError> {
        let address = address
            .unwrap_or(&self.context().config().server.bind_address)
            .to_string();
        TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        self.server.run(listener, shutdown).await
    }
}
