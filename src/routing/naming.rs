//! Naming rules for controllers and views.
//!
//! # Responsibilities
//! - Keep first-level controllers off the framework's reserved segments
//! - Keep root views off the same segments
//! - Reject duplicate views within one controller
//! - Keep router pattern syntax out of controller directory names
//!
//! # Design Decisions
//! - Reserved segments: `/static` (assets), `/data` (REST), `/backbone-models` (client models)
//! - First-level names are checked all at once, before any of them is routed

use std::collections::HashSet;
use std::path::Path;

use crate::controller::ControllerDescriptor;
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::grammar::{has_route_metachars, split_view_key, Verb};

/// Segment serving files from `app/static`.
pub const STATIC_SEGMENT: &str = "static";
/// Segment owned by the REST data endpoint.
pub const DATA_SEGMENT: &str = "data";
/// Segment serving generated client-side models.
pub const CLIENT_MODELS_SEGMENT: &str = "backbone-models";

/// Segments the framework itself owns.
pub const RESERVED_SEGMENTS: [&str; 3] = [STATIC_SEGMENT, DATA_SEGMENT, CLIENT_MODELS_SEGMENT];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_SEGMENTS.contains(&name)
}

/// Validate the names of every first-level controller directory.
pub fn check_first_level<'a>(
    controllers_dir: &Path,
    names: impl IntoIterator<Item = &'a str>,
) -> RouteResult<()> {
    for name in names {
        check_controller_name(controllers_dir, name)?;
        if is_reserved(name) {
            return Err(RouteError::InvalidControllerName {
                path: controllers_dir.join(name),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate a controller directory name at any depth. The name becomes a
/// literal URL segment, so it can't carry `*`, `{`, `}` or `?`.
pub fn check_controller_name(controllers_dir: &Path, name: &str) -> RouteResult<()> {
    if has_route_metachars(name) {
        return Err(RouteError::InvalidControllerName {
            path: controllers_dir.join(name),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Validate a controller's views before they are parsed into routes.
///
/// Root views must not take a reserved name; no two views may resolve to the
/// same verb and name.
pub fn check_views(descriptor: &ControllerDescriptor) -> RouteResult<()> {
    let mut seen: HashSet<(Verb, &str)> = HashSet::new();
    for (key, _) in descriptor.views() {
        let (verb, name) =
            split_view_key(key).map_err(|err| err.in_controller(descriptor.dir()))?;

        if descriptor.is_root() && is_reserved(name) {
            return Err(RouteError::InvalidViewName {
                path: descriptor.dir().to_path_buf(),
                name: name.to_string(),
            });
        }

        if !seen.insert((verb, name)) {
            return Err(RouteError::DuplicateView {
                path: descriptor.dir().to_path_buf(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}
