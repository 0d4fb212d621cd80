//! Route resolution errors.
//!
//! Every variant is fatal at startup: nothing is retried and nothing is
//! swallowed. The error carries the offending path or name so the operator
//! can find the broken controller without re-running with extra logging.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the controller tree into a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A first-level controller claims a framework-reserved segment.
    #[error("a first-level controller can't be named \"{name}\" ({path})")]
    InvalidControllerName { path: PathBuf, name: String },

    /// A root controller view claims a framework-reserved segment.
    #[error("a root view can't be named \"{name}\" ({path})")]
    InvalidViewName { path: PathBuf, name: String },

    /// The verb prefix of a view key is not a supported HTTP method.
    #[error("view \"{key}\" uses unsupported verb \"{verb}\"")]
    InvalidVerb { key: String, verb: String },

    /// The view key does not follow the `verb:name` / `name` grammar.
    #[error("view key \"{key}\" is malformed: {reason}")]
    MalformedViewKey { key: String, reason: String },

    /// The view definition has an unusable shape.
    #[error("view \"{key}\" has an invalid definition: {reason}")]
    InvalidViewDefinition { key: String, reason: String },

    /// Two views of the same controller resolve to the same verb and name.
    #[error("view \"{key}\" is declared more than once in {path}")]
    DuplicateView { path: PathBuf, key: String },

    /// A view references a middleware nobody registered.
    #[error("view \"{view}\" in {path} uses unknown middleware \"{name}\"")]
    UnknownMiddleware {
        path: PathBuf,
        view: String,
        name: String,
    },

    /// A manifest references an action nobody registered.
    #[error("view \"{view}\" in {path} uses unknown action \"{name}\"")]
    UnknownAction {
        path: PathBuf,
        view: String,
        name: String,
    },

    /// The controller directory exists but holds no loadable definition.
    #[error("no controller definition found in {path}")]
    MissingControllerFile { path: PathBuf },

    /// The controller manifest could not be parsed.
    #[error("failed to parse controller manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Listing or reading the controller tree failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parser error, located at the controller it came from.
    #[error("in controller {path}: {source}")]
    InController {
        path: PathBuf,
        #[source]
        source: Box<RouteError>,
    },
}

impl RouteError {
    /// Attach the controller directory to a path-less parser error.
    pub fn in_controller(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ (RouteError::InvalidVerb { .. }
            | RouteError::MalformedViewKey { .. }
            | RouteError::InvalidViewDefinition { .. }) => RouteError::InController {
                path: path.into(),
                source: Box::new(err),
            },
            other => other,
        }
    }

    /// The innermost error, looking through [`RouteError::InController`].
    pub fn root_cause(&self) -> &RouteError {
        match self {
            RouteError::InController { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for route resolution.
pub type RouteResult<T> = Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouteError::InvalidControllerName {
            path: PathBuf::from("/app/controllers/static"),
            name: "static".into(),
        };
        assert!(err.to_string().contains("\"static\""));

        let err = RouteError::InvalidVerb {
            key: "fetch:items".into(),
            verb: "fetch".into(),
        };
        assert_eq!(err.to_string(), "view \"fetch:items\" uses unsupported verb \"fetch\"");
    }

    #[test]
    fn test_in_controller_wraps_parser_errors_only() {
        let wrapped = RouteError::InvalidVerb {
            key: "x:y".into(),
            verb: "x".into(),
        }
        .in_controller("/app/controllers/blog");
        assert!(matches!(wrapped, RouteError::InController { .. }));
        assert!(matches!(wrapped.root_cause(), RouteError::InvalidVerb { .. }));

        let untouched = RouteError::MissingControllerFile {
            path: PathBuf::from("/x"),
        }
        .in_controller("/app/controllers/blog");
        assert!(matches!(untouched, RouteError::MissingControllerFile { .. }));
    }
}
