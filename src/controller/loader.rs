//! Controller loading.
//!
//! The walker decides *where* controllers are; a [`ControllerLoader`] decides
//! *what* they declare. Loaders are keyed by the controller's name path, the
//! directory names from `app/controllers` down with the `controllers/`
//! infixes dropped (`["blog", "post"]` for
//! `app/controllers/blog/controllers/post`).

use std::collections::HashMap;
use std::path::Path;

use crate::controller::ControllerDefinition;
use crate::routing::error::{RouteError, RouteResult};

/// Source of controller definitions.
pub trait ControllerLoader {
    /// Load the controller living in `dir`.
    ///
    /// Returns [`RouteError::MissingControllerFile`] when `dir` holds no
    /// definition this loader knows about.
    fn load(&self, dir: &Path, name_path: &[String]) -> RouteResult<ControllerDefinition>;
}

impl<L: ControllerLoader + ?Sized> ControllerLoader for &L {
    fn load(&self, dir: &Path, name_path: &[String]) -> RouteResult<ControllerDefinition> {
        (**self).load(dir, name_path)
    }
}

impl<L: ControllerLoader + ?Sized> ControllerLoader for Box<L> {
    fn load(&self, dir: &Path, name_path: &[String]) -> RouteResult<ControllerDefinition> {
        (**self).load(dir, name_path)
    }
}

/// Controllers compiled into the application, keyed by name path.
#[derive(Debug, Clone, Default)]
pub struct RegistryLoader {
    controllers: HashMap<String, ControllerDefinition>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the controller at `name_path` (`"blog/post"`).
    pub fn register(&mut self, name_path: &str, definition: ControllerDefinition) -> &mut Self {
        self.controllers
            .insert(name_path.trim_matches('/').to_string(), definition);
        self
    }

    /// Builder-style [`RegistryLoader::register`].
    pub fn with(mut self, name_path: &str, definition: ControllerDefinition) -> Self {
        self.register(name_path, definition);
        self
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl ControllerLoader for RegistryLoader {
    fn load(&self, dir: &Path, name_path: &[String]) -> RouteResult<ControllerDefinition> {
        if !dir.is_dir() {
            return Err(RouteError::MissingControllerFile {
                path: dir.to_path_buf(),
            });
        }
        self.controllers
            .get(&name_path.join("/"))
            .cloned()
            .ok_or_else(|| RouteError::MissingControllerFile {
                path: dir.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ViewDefinition;

    #[test]
    fn test_registry_loader_lookup() {
        let dir = std::env::temp_dir();
        let loader = RegistryLoader::new().with(
            "/blog/post/",
            ControllerDefinition::new().view("index", ViewDefinition::file("i.html")),
        );

        let def = loader
            .load(&dir, &["blog".to_string(), "post".to_string()])
            .unwrap();
        assert_eq!(def.views.len(), 1);

        let err = loader.load(&dir, &["blog".to_string()]).unwrap_err();
        assert!(matches!(err, RouteError::MissingControllerFile { .. }));
    }

    #[test]
    fn test_registry_loader_requires_directory() {
        let loader = RegistryLoader::new().with("ghost", ControllerDefinition::new());
        let err = loader
            .load(Path::new("/definitely/not/here"), &["ghost".to_string()])
            .unwrap_err();
        assert!(matches!(err, RouteError::MissingControllerFile { .. }));
    }
}
