//! Controller and view definitions.
//!
//! A controller is declared once (in code or in a manifest) as a
//! [`ControllerDefinition`]. The walker wraps it into a [`ControllerDescriptor`]
//! once it knows where the controller sits in the tree.

use std::path::{Path, PathBuf};

use crate::http::Handler;

/// What a configured view runs.
#[derive(Clone)]
pub enum ViewAction {
    /// Serve a template file from the controller's `views/` directory.
    File(String),
    /// Run a handler.
    Handler(Handler),
}

impl std::fmt::Debug for ViewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewAction::File(file) => f.debug_tuple("File").field(file).finish(),
            ViewAction::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// A view with parameters, middlewares and alias routes.
#[derive(Debug, Clone)]
pub struct ConfiguredView {
    pub action: ViewAction,
    /// Path parameter names, appended as `/:name` in order.
    pub params: Vec<String>,
    /// Middleware names, resolved through the middleware registry.
    pub middlewares: Vec<String>,
    /// Additional absolute paths bound to the same handler.
    pub custom_routes: Vec<String>,
}

impl ConfiguredView {
    pub fn new(action: ViewAction) -> Self {
        Self {
            action,
            params: Vec::new(),
            middlewares: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(ViewAction::File(name.into()))
    }

    pub fn handler(handler: Handler) -> Self {
        Self::new(ViewAction::Handler(handler))
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn middlewares<I, S>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middlewares = middlewares.into_iter().map(Into::into).collect();
        self
    }

    pub fn custom_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    /// A single alias; same as `custom_routes([route])`.
    pub fn custom_route(self, route: impl Into<String>) -> Self {
        self.custom_routes([route.into()])
    }
}

/// One routable unit of a controller.
#[derive(Clone)]
pub enum ViewDefinition {
    /// A template file served verbatim.
    Static(String),
    /// A bare handler with no options.
    Action(Handler),
    /// A handler or file with params, middlewares and aliases.
    Configured(ConfiguredView),
}

impl ViewDefinition {
    pub fn file(name: impl Into<String>) -> Self {
        ViewDefinition::Static(name.into())
    }

    pub fn action(handler: Handler) -> Self {
        ViewDefinition::Action(handler)
    }

    pub fn configured(view: ConfiguredView) -> Self {
        ViewDefinition::Configured(view)
    }

    pub fn kind(&self) -> ViewDefinitionKind {
        match self {
            ViewDefinition::Static(_) => ViewDefinitionKind::Static,
            ViewDefinition::Action(_) => ViewDefinitionKind::Action,
            ViewDefinition::Configured(_) => ViewDefinitionKind::Configured,
        }
    }
}

impl std::fmt::Debug for ViewDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewDefinition::Static(file) => f.debug_tuple("Static").field(file).finish(),
            ViewDefinition::Action(_) => f.write_str("Action(..)"),
            ViewDefinition::Configured(view) => f.debug_tuple("Configured").field(view).finish(),
        }
    }
}

/// The tag of a [`ViewDefinition`], for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDefinitionKind {
    Static,
    Action,
    Configured,
}

/// A controller as declared by the application.
#[derive(Debug, Clone, Default)]
pub struct ControllerDefinition {
    /// View used as the controller index; falls back to `routes.main_view`.
    pub main_view: Option<String>,
    /// Views in declaration order.
    pub views: Vec<(String, ViewDefinition)>,
}

impl ControllerDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_view(mut self, name: impl Into<String>) -> Self {
        self.main_view = Some(name.into());
        self
    }

    pub fn view(mut self, key: impl Into<String>, view: ViewDefinition) -> Self {
        self.views.push((key.into(), view));
        self
    }
}

/// A controller located in the tree.
#[derive(Debug, Clone)]
pub struct ControllerDescriptor {
    dir: PathBuf,
    lineage: Vec<String>,
    main_view: String,
    views: Vec<(String, ViewDefinition)>,
}

impl ControllerDescriptor {
    /// Place `definition` at `dir` with the given lineage.
    pub fn new(
        dir: impl Into<PathBuf>,
        lineage: Vec<String>,
        definition: ControllerDefinition,
        default_main_view: &str,
    ) -> Self {
        Self {
            dir: dir.into(),
            lineage,
            main_view: definition
                .main_view
                .unwrap_or_else(|| default_main_view.to_string()),
            views: definition.views,
        }
    }

    /// Directory holding the controller (and its `views/`, `controllers/`).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path segments from the application root; empty for the root controller.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    pub fn is_root(&self) -> bool {
        self.lineage.is_empty()
    }

    /// Depth in the tree; the root controller is depth 0.
    pub fn depth(&self) -> usize {
        self.lineage.len()
    }

    pub fn main_view(&self) -> &str {
        &self.main_view
    }

    pub fn views(&self) -> &[(String, ViewDefinition)] {
        &self.views
    }

    /// Directory static-file views are resolved against.
    pub fn views_dir(&self) -> PathBuf {
        self.dir.join("views")
    }

    /// Lineage rendered as a URL prefix, `/` for the root.
    pub fn url_prefix(&self) -> String {
        format!("/{}", self.lineage.join("/"))
    }
}
