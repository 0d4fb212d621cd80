//! One-shot route resolution.
//!
//! Drives the walker and, for every controller it visits, validates the view
//! names, parses each view and binds the result. Either the whole tree
//! resolves into a [`RouteTable`] or the first error comes back.

use std::path::Path;

use crate::config::RoutesConfig;
use crate::controller::ControllerLoader;
use crate::http::MiddlewareRegistry;
use crate::routing::binder::{RouteBinder, RouteTable};
use crate::routing::error::RouteResult;
use crate::routing::grammar::parse_view;
use crate::routing::naming;
use crate::routing::walker::ControllerWalker;

/// Resolve the controller tree under `root` into a complete route table.
pub fn resolve_routes<L: ControllerLoader>(
    root: &Path,
    routes: &RoutesConfig,
    loader: L,
    middlewares: &MiddlewareRegistry,
) -> RouteResult<RouteTable> {
    let walker = ControllerWalker::new(root, &routes.main_controller, &routes.main_view, loader);
    let mut binder = RouteBinder::new(middlewares);
    let mut controllers = 0usize;

    walker.walk_with(|descriptor| {
        naming::check_views(&descriptor)?;

        let specs = descriptor
            .views()
            .iter()
            .map(|(key, view)| {
                parse_view(key, view, descriptor.lineage(), descriptor.main_view())
                    .map(|spec| (key.as_str(), view, spec))
                    .map_err(|err| err.in_controller(descriptor.dir()))
            })
            .collect::<RouteResult<Vec<_>>>()?;

        binder.bind_controller(&descriptor, &specs)?;
        controllers += 1;
        Ok(())
    })?;

    let table = binder.finish();
    tracing::info!(
        controllers,
        routes = table.len(),
        root = %root.display(),
        "Controller tree resolved"
    );
    Ok(table)
}
