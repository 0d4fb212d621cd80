//! View key grammar and route path construction.
//!
//! # Grammar
//! ```text
//! view-key   = [ verb ":" ] view-name
//! verb       = "get" | "post" | "put" | "delete" | "patch" | "head" | "options"   (case-insensitive)
//! view-name  = 1*( any char except ":" "/" "*" "{" "}" "?" whitespace )
//!
//! primary    = "/" lineage "/" view-name params      (root: "/" view-name params)
//! index      = "/" lineage params "/?"                (root: "/" params)
//! alias      = custom-route params                   (custom-route: "/" segments, first not reserved)
//! params     = *( "/:" param-name )
//! ```
//!
//! # Design Decisions
//! - Pure: no filesystem access, no registry lookups
//! - `/?` marks an optional trailing slash; the dispatcher expands it
//! - Parameter names may be declared with or without the leading `:`

use std::fmt;

use crate::controller::{ViewAction, ViewDefinition};
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::naming::is_reserved;

/// Separates the verb from the view name in a view key.
pub const VERB_DELIMITER: char = ':';

/// Suffix marking an optional trailing slash in a URL pattern.
pub const OPTIONAL_SLASH: &str = "/?";

/// Characters the HTTP router reads as pattern syntax.
pub const ROUTE_METACHARS: [char; 4] = ['*', '{', '}', '?'];

/// Whether `segment` would be read as something other than a literal.
pub fn has_route_metachars(segment: &str) -> bool {
    segment.contains(ROUTE_METACHARS)
}

/// HTTP verbs a view can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Delete,
        Verb::Patch,
        Verb::Head,
        Verb::Options,
    ];

    /// Parse a verb token, case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.to_ascii_lowercase();
        Verb::ALL.into_iter().find(|verb| verb.as_str() == token)
    }

    /// Lower-case token as written in view keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Patch => "patch",
            Verb::Head => "head",
            Verb::Options => "options",
        }
    }

    pub fn method(&self) -> axum::http::Method {
        use axum::http::Method;
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
            Verb::Patch => Method::PATCH,
            Verb::Head => Method::HEAD,
            Verb::Options => Method::OPTIONS,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// Normalized routing information for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub verb: Verb,
    /// The view's own segment, verb stripped.
    pub view_name: String,
    /// Rendered `/:name` segments, in declaration order.
    pub param_segments: Vec<String>,
    pub primary_path: String,
    pub alias_paths: Vec<String>,
    /// Controller-root path; only set for the controller's main view.
    pub index_path: Option<String>,
}

/// Split a view key into its verb and view name.
pub fn split_view_key(key: &str) -> RouteResult<(Verb, &str)> {
    let mut parts = key.split(VERB_DELIMITER);
    let (verb, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, _) => (Verb::Get, name),
        (Some(token), Some(name), None) => {
            let verb = Verb::from_token(token).ok_or_else(|| RouteError::InvalidVerb {
                key: key.to_string(),
                verb: token.to_string(),
            })?;
            (verb, name)
        }
        _ => {
            return Err(malformed(key, "more than one verb delimiter"));
        }
    };

    if name.is_empty() {
        return Err(malformed(key, "empty view name"));
    }
    if name.contains('/') || name.chars().any(char::is_whitespace) {
        return Err(malformed(key, "view names can't contain '/' or whitespace"));
    }
    if has_route_metachars(name) {
        return Err(malformed(key, "view names can't contain '*', '{', '}' or '?'"));
    }

    Ok((verb, name))
}

/// Parse one view into its route spec.
///
/// `main_view` is the controller's index view key; when `key` equals it the
/// returned `RouteSpec` also gets an `index_path`.
pub fn parse_view(
    key: &str,
    view: &ViewDefinition,
    lineage: &[String],
    main_view: &str,
) -> RouteResult<RouteSpec> {
    let (verb, view_name) = split_view_key(key)?;

    let (params, custom_routes): (&[String], &[String]) = match view {
        ViewDefinition::Static(file) => {
            check_file(key, file)?;
            (&[], &[])
        }
        ViewDefinition::Action(_) => (&[], &[]),
        ViewDefinition::Configured(configured) => {
            if let ViewAction::File(file) = &configured.action {
                check_file(key, file)?;
            }
            (&configured.params, &configured.custom_routes)
        }
    };

    let param_segments = params
        .iter()
        .map(|param| render_param(key, param))
        .collect::<RouteResult<Vec<_>>>()?;

    let prefix = lineage_prefix(lineage);
    let primary_path = append_segments(&format!("{prefix}/{view_name}"), &param_segments);

    let alias_paths = custom_routes
        .iter()
        .map(|route| {
            check_custom_route(key, route)?;
            Ok(append_segments(route, &param_segments))
        })
        .collect::<RouteResult<Vec<_>>>()?;

    let index_path = (key == main_view).then(|| index_path(&prefix, &param_segments));

    Ok(RouteSpec {
        verb,
        view_name: view_name.to_string(),
        param_segments,
        primary_path,
        alias_paths,
        index_path,
    })
}

/// `/a/b` for `[a, b]`, the empty string for the root.
fn lineage_prefix(lineage: &[String]) -> String {
    lineage.iter().map(|segment| format!("/{segment}")).collect()
}

fn index_path(prefix: &str, params: &[String]) -> String {
    let path = append_segments(prefix, params);
    if path.is_empty() {
        "/".to_string()
    } else if prefix.is_empty() {
        path
    } else {
        format!("{path}{OPTIONAL_SLASH}")
    }
}

fn append_segments(base: &str, segments: &[String]) -> String {
    if segments.is_empty() {
        return base.to_string();
    }
    let mut path = base.trim_end_matches('/').to_string();
    path.extend(segments.iter().map(String::as_str));
    path
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn render_param(key: &str, param: &str) -> RouteResult<String> {
    let name = param.strip_prefix(':').unwrap_or(param);
    if !is_param_name(name) {
        return Err(RouteError::InvalidViewDefinition {
            key: key.to_string(),
            reason: format!("invalid parameter name \"{param}\""),
        });
    }
    Ok(format!("/:{name}"))
}

/// Custom routes are absolute, stay off the reserved segments and only use
/// `:name` as pattern syntax.
fn check_custom_route(key: &str, route: &str) -> RouteResult<()> {
    let invalid = |reason: String| RouteError::InvalidViewDefinition {
        key: key.to_string(),
        reason,
    };
    let Some(rest) = route.strip_prefix('/') else {
        return Err(invalid(format!("custom route \"{route}\" must start with '/'")));
    };

    let first = rest.split('/').next().unwrap_or_default();
    if is_reserved(first) {
        return Err(invalid(format!(
            "custom route \"{route}\" claims the reserved \"/{first}\" segment"
        )));
    }
    for segment in rest.split('/') {
        let literal = match segment.strip_prefix(':') {
            Some(name) if is_param_name(name) => continue,
            Some(_) => false,
            None => !has_route_metachars(segment),
        };
        if !literal {
            return Err(invalid(format!(
                "custom route \"{route}\" has an invalid segment \"{segment}\""
            )));
        }
    }
    Ok(())
}

fn check_file(key: &str, file: &str) -> RouteResult<()> {
    let reason = if file.is_empty() {
        "static file name is empty"
    } else if file.starts_with('/') || file.starts_with('\\') {
        "static file must be relative to the views directory"
    } else if file.split(['/', '\\']).any(|part| part == "..") {
        "static file can't leave the views directory"
    } else {
        return Ok(());
    };
    Err(RouteError::InvalidViewDefinition {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

fn malformed(key: &str, reason: &str) -> RouteError {
    RouteError::MalformedViewKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
