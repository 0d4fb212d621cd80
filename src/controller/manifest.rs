//! TOML controller manifests.
//!
//! A manifest lives at `<controller>/index.toml`:
//!
//! ```toml
//! main_view = "index"
//!
//! [views]
//! index = "index.html"                                  # static file
//! "post:enter" = { handler = "enter" }                  # bare action
//! login = { file = "login.html", middlewares = ["not-logged"], custom_routes = "/signin" }
//! echo = { handler = "echo", params = ["text"], custom_routes = ["/return", "/answer"] }
//! ```
//!
//! Handler names resolve through an [`ActionRegistry`]. Views keep document
//! order.

use std::path::Path;

use serde::Deserialize;

use crate::controller::loader::ControllerLoader;
use crate::controller::{ConfiguredView, ControllerDefinition, ViewAction, ViewDefinition};
use crate::http::ActionRegistry;
use crate::routing::error::{RouteError, RouteResult};

/// File name of a controller manifest.
pub const MANIFEST_FILE: &str = "index.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ControllerManifest {
    main_view: Option<String>,
    #[serde(default)]
    views: toml::Table,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewTable {
    handler: Option<String>,
    file: Option<String>,
    #[serde(default)]
    params: Vec<String>,
    #[serde(default)]
    middlewares: Vec<String>,
    custom_routes: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl ViewTable {
    fn is_bare(&self) -> bool {
        self.file.is_none()
            && self.params.is_empty()
            && self.middlewares.is_empty()
            && self.custom_routes.is_none()
    }
}

/// Loads controllers from `index.toml` manifests.
#[derive(Debug, Clone, Default)]
pub struct ManifestLoader {
    actions: ActionRegistry,
}

impl ManifestLoader {
    pub fn new(actions: ActionRegistry) -> Self {
        Self { actions }
    }

    /// Parse manifest text; `dir` is only used for error reporting.
    pub fn parse(&self, dir: &Path, text: &str) -> RouteResult<ControllerDefinition> {
        let manifest: ControllerManifest =
            toml::from_str(text).map_err(|source| RouteError::Manifest {
                path: dir.join(MANIFEST_FILE),
                source,
            })?;

        let mut definition = ControllerDefinition {
            main_view: manifest.main_view,
            views: Vec::with_capacity(manifest.views.len()),
        };
        for (key, value) in manifest.views {
            let view = self.view(dir, &key, value)?;
            definition.views.push((key, view));
        }
        Ok(definition)
    }

    fn view(&self, dir: &Path, key: &str, value: toml::Value) -> RouteResult<ViewDefinition> {
        let table: ViewTable = match value {
            toml::Value::String(file) => return Ok(ViewDefinition::Static(file)),
            value @ toml::Value::Table(_) => {
                value
                    .try_into()
                    .map_err(|err: toml::de::Error| RouteError::InvalidViewDefinition {
                        key: key.to_string(),
                        reason: err.message().to_string(),
                    })?
            }
            other => {
                return Err(RouteError::InvalidViewDefinition {
                    key: key.to_string(),
                    reason: format!("expected a file name or a table, found {}", other.type_str()),
                })
            }
        };

        let action = match (&table.handler, &table.file) {
            (Some(name), None) => ViewAction::Handler(self.actions.get(name).ok_or_else(|| {
                RouteError::UnknownAction {
                    path: dir.to_path_buf(),
                    view: key.to_string(),
                    name: name.clone(),
                }
            })?),
            (None, Some(file)) => ViewAction::File(file.clone()),
            (Some(_), Some(_)) => {
                return Err(RouteError::InvalidViewDefinition {
                    key: key.to_string(),
                    reason: "set either `handler` or `file`, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(RouteError::InvalidViewDefinition {
                    key: key.to_string(),
                    reason: "missing `handler` or `file`".to_string(),
                })
            }
        };

        if table.is_bare() {
            if let ViewAction::Handler(handler) = action {
                return Ok(ViewDefinition::Action(handler));
            }
        }

        let custom_routes = match table.custom_routes {
            None => Vec::new(),
            Some(OneOrMany::One(route)) => vec![route],
            Some(OneOrMany::Many(routes)) => routes,
        };
        Ok(ViewDefinition::Configured(
            ConfiguredView::new(action)
                .params(table.params)
                .middlewares(table.middlewares)
                .custom_routes(custom_routes),
        ))
    }
}

impl ControllerLoader for ManifestLoader {
    fn load(&self, dir: &Path, _name_path: &[String]) -> RouteResult<ControllerDefinition> {
        let path = dir.join(MANIFEST_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(RouteError::MissingControllerFile {
                    path: dir.to_path_buf(),
                })
            }
            Err(source) => return Err(RouteError::Io { path, source }),
        };
        tracing::trace!(manifest = %path.display(), "Loading controller manifest");
        self.parse(dir, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ViewDefinitionKind;
    use crate::http::handler;
    use std::sync::Arc;

    fn loader() -> ManifestLoader {
        ManifestLoader::new(
            ActionRegistry::new()
                .with("enter", handler(|_cx| async { "entered" }))
                .with("echo", handler(|_cx| async { "echo" })),
        )
    }

    const MANIFEST: &str = r#"
main_view = "index"

[views]
index = "index.html"
"post:enter" = { handler = "enter" }
login = { file = "login.html", middlewares = ["not-logged"], custom_routes = "/signin" }
echo = { handler = "echo", params = [":text"], custom_routes = ["/return", "/answer"] }
"#;

    #[test]
    fn test_parse_manifest_keeps_document_order() {
        let def = loader().parse(Path::new("/app/controllers/main"), MANIFEST).unwrap();
        assert_eq!(def.main_view.as_deref(), Some("index"));
        let keys: Vec<_> = def.views.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["index", "post:enter", "login", "echo"]);

        let kinds: Vec<_> = def.views.iter().map(|(_, v)| v.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ViewDefinitionKind::Static,
                ViewDefinitionKind::Action,
                ViewDefinitionKind::Configured,
                ViewDefinitionKind::Configured,
            ]
        );

        match &def.views[2].1 {
            ViewDefinition::Configured(view) => {
                assert_eq!(view.custom_routes, vec!["/signin"]);
                assert_eq!(view.middlewares, vec!["not-logged"]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_bare_action_shares_registered_handler() {
        let actions = ActionRegistry::new().with("enter", handler(|_cx| async { "in" }));
        let registered = actions.get("enter").unwrap();
        let def = ManifestLoader::new(actions)
            .parse(Path::new("/c"), "[views]\n\"post:enter\" = { handler = \"enter\" }\n")
            .unwrap();
        match &def.views[0].1 {
            ViewDefinition::Action(h) => assert!(Arc::ptr_eq(h, &registered)),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action() {
        let err = loader()
            .parse(Path::new("/c"), "[views]\nx = { handler = \"missing\" }\n")
            .unwrap_err();
        assert!(matches!(err, RouteError::UnknownAction { name, .. } if name == "missing"));
    }

    #[test]
    fn test_invalid_view_shapes() {
        for text in [
            "[views]\nx = 3\n",
            "[views]\nx = { file = \"a.html\", handler = \"echo\" }\n",
            "[views]\nx = { params = [\"id\"] }\n",
            "[views]\nx = { file = \"a.html\", colour = \"red\" }\n",
        ] {
            let err = loader().parse(Path::new("/c"), text).unwrap_err();
            assert!(
                matches!(err, RouteError::InvalidViewDefinition { .. }),
                "{text:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_broken_manifest() {
        let err = loader().parse(Path::new("/c"), "views = [").unwrap_err();
        assert!(matches!(err, RouteError::Manifest { .. }));
    }

    #[test]
    fn test_missing_manifest() {
        let err = loader()
            .load(&std::env::temp_dir().join("cadenza-no-such-controller"), &[])
            .unwrap_err();
        assert!(matches!(err, RouteError::MissingControllerFile { .. }));
    }
}
