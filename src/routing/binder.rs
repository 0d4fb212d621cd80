//! Route binding.
//!
//! # Responsibilities
//! - Turn a controller's route specs into concrete bindings
//! - Build each view's handler once (static file, action, middleware chain)
//! - Collect bindings in discovery order into a write-once route table
//! - Hand a complete table to the dispatcher
//!
//! # Design Decisions
//! - Aliases and the controller index reuse the view's handler `Arc`
//! - No deduplication here; collisions are the dispatcher's call
//! - Nothing reaches the dispatcher until the whole tree resolved

use std::fmt;

use crate::controller::{ControllerDescriptor, ViewAction, ViewDefinition};
use crate::http::{compose, static_file, Handler, MiddlewareRegistry};
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::grammar::{RouteSpec, Verb};

/// Why a binding exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// The view under its own name.
    Primary,
    /// A custom route of a configured view.
    Alias,
    /// The controller root, bound to its main view.
    Index,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingKind::Primary => "primary",
            BindingKind::Alias => "alias",
            BindingKind::Index => "index",
        })
    }
}

/// One `(verb, pattern) -> handler` entry of the route table.
#[derive(Clone)]
pub struct RouteBinding {
    pub verb: Verb,
    pub url_pattern: String,
    pub handler: Handler,
    pub kind: BindingKind,
    /// `/`-joined lineage of the controller the view belongs to.
    pub controller: String,
    /// View key as declared.
    pub view: String,
}

impl fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBinding")
            .field("verb", &self.verb)
            .field("url_pattern", &self.url_pattern)
            .field("kind", &self.kind)
            .field("controller", &self.controller)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

/// Receives bindings in table order.
///
/// The dispatcher owns collision policy; the engine only guarantees order.
pub trait Dispatcher {
    fn bind(&mut self, verb: Verb, pattern: &str, handler: Handler);
}

/// Ordered, write-once output of route resolution.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl RouteTable {
    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings as `(verb, pattern)` pairs, for comparisons and listings.
    pub fn patterns(&self) -> Vec<(Verb, &str)> {
        self.bindings
            .iter()
            .map(|b| (b.verb, b.url_pattern.as_str()))
            .collect()
    }

    /// Hand every binding to `dispatcher`, in order.
    pub fn install<D: Dispatcher + ?Sized>(&self, dispatcher: &mut D) {
        for binding in &self.bindings {
            dispatcher.bind(binding.verb, &binding.url_pattern, binding.handler.clone());
        }
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bindings {
            let controller = if b.controller.is_empty() { "<root>" } else { &b.controller };
            writeln!(
                f,
                "{:<8}{:<40}{:<9}{controller} {}",
                b.verb.to_string(),
                b.url_pattern,
                b.kind.to_string(),
                b.view
            )?;
        }
        Ok(())
    }
}

/// Builds the route table one controller at a time.
pub struct RouteBinder<'a> {
    middlewares: &'a MiddlewareRegistry,
    table: RouteTable,
}

impl<'a> RouteBinder<'a> {
    pub fn new(middlewares: &'a MiddlewareRegistry) -> Self {
        Self {
            middlewares,
            table: RouteTable::default(),
        }
    }

    /// Bind every view of `descriptor`.
    ///
    /// `specs` pairs each view key with its parsed spec, in view order.
    pub fn bind_controller(
        &mut self,
        descriptor: &ControllerDescriptor,
        specs: &[(&str, &ViewDefinition, RouteSpec)],
    ) -> RouteResult<()> {
        let controller = descriptor.lineage().join("/");
        let mut index = None;

        for (key, view, spec) in specs {
            let handler = self.build_handler(descriptor, key, view)?;

            self.push(spec.verb, &spec.primary_path, &handler, BindingKind::Primary, &controller, key);
            for alias in &spec.alias_paths {
                self.push(spec.verb, alias, &handler, BindingKind::Alias, &controller, key);
            }
            if let Some(path) = &spec.index_path {
                index = Some((spec.verb, path.clone(), handler, *key));
            }
        }

        if let Some((verb, path, handler, key)) = index {
            self.push(verb, &path, &handler, BindingKind::Index, &controller, key);
        }

        Ok(())
    }

    /// Finish binding and return the complete table.
    pub fn finish(self) -> RouteTable {
        self.table
    }

    fn build_handler(
        &self,
        descriptor: &ControllerDescriptor,
        key: &str,
        view: &ViewDefinition,
    ) -> RouteResult<Handler> {
        let handler = match view {
            ViewDefinition::Static(file) => static_file(descriptor.views_dir().join(file)),
            ViewDefinition::Action(handler) => handler.clone(),
            ViewDefinition::Configured(configured) => {
                let endpoint = match &configured.action {
                    ViewAction::File(file) => static_file(descriptor.views_dir().join(file)),
                    ViewAction::Handler(handler) => handler.clone(),
                };
                let chain = self
                    .middlewares
                    .resolve(configured.middlewares.iter().map(String::as_str))
                    .map_err(|name| RouteError::UnknownMiddleware {
                        path: descriptor.dir().to_path_buf(),
                        view: key.to_string(),
                        name: name.to_string(),
                    })?;
                if chain.is_empty() {
                    endpoint
                } else {
                    compose(chain, endpoint)
                }
            }
        };
        Ok(handler)
    }

    fn push(
        &mut self,
        verb: Verb,
        pattern: &str,
        handler: &Handler,
        kind: BindingKind,
        controller: &str,
        view: &str,
    ) {
        tracing::debug!(
            verb = %verb,
            pattern = %pattern,
            kind = %kind,
            controller = %controller,
            view = %view,
            "Route bound"
        );
        self.table.bindings.push(RouteBinding {
            verb,
            url_pattern: pattern.to_string(),
            handler: handler.clone(),
            kind,
            controller: controller.to_string(),
            view: view.to_string(),
        });
    }
}
