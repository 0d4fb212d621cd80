//! Breadth-first controller discovery.
//!
//! # Responsibilities
//! - Route the main controller first, as the application root
//! - Discover first-level controllers under `app/controllers` and vet their names
//! - Follow each controller's `controllers/` directory breadth-first
//!
//! # Design Decisions
//! - Siblings are visited in name order so every run yields the same table
//! - A missing `controllers/` directory marks a leaf, not an error
//! - Symlinked directories are not followed; the tree can't cycle
//! - The first error stops the walk

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::controller::{ControllerDescriptor, ControllerLoader};
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::naming;

/// Directory holding the controllers of one level.
pub const CONTROLLERS_DIR: &str = "controllers";

/// Walks an application's controller tree.
pub struct ControllerWalker<L> {
    controllers_dir: PathBuf,
    main_controller: String,
    main_view: String,
    loader: L,
}

struct Pending {
    dir: PathBuf,
    lineage: Vec<String>,
}

impl<L: ControllerLoader> ControllerWalker<L> {
    /// `root` is the application root (the directory holding `app/`).
    pub fn new(
        root: &Path,
        main_controller: impl Into<String>,
        main_view: impl Into<String>,
        loader: L,
    ) -> Self {
        Self {
            controllers_dir: root.join("app").join(CONTROLLERS_DIR),
            main_controller: main_controller.into(),
            main_view: main_view.into(),
            loader,
        }
    }

    pub fn controllers_dir(&self) -> &Path {
        &self.controllers_dir
    }

    /// Visit every controller in breadth-first order.
    ///
    /// The main controller comes first with an empty lineage; then depth 1,
    /// depth 2, and so on. Stops at the first error from loading, naming or
    /// `visit`.
    pub fn walk_with<F>(&self, mut visit: F) -> RouteResult<()>
    where
        F: FnMut(ControllerDescriptor) -> RouteResult<()>,
    {
        let root_dir = self.controllers_dir.join(&self.main_controller);
        tracing::debug!(dir = %root_dir.display(), "Routing main controller");
        visit(self.load(root_dir, Vec::new(), &[self.main_controller.clone()])?)?;

        let first_level = list_controllers(&self.controllers_dir)?;
        naming::check_first_level(
            &self.controllers_dir,
            first_level.iter().map(String::as_str),
        )?;

        let mut queue: VecDeque<Pending> = first_level
            .into_iter()
            .map(|name| Pending {
                dir: self.controllers_dir.join(&name),
                lineage: vec![name],
            })
            .collect();

        while let Some(Pending { dir, lineage }) = queue.pop_front() {
            let children_dir = dir.join(CONTROLLERS_DIR);
            let descriptor = self.load(dir, lineage.clone(), &lineage)?;
            visit(descriptor)?;

            for child in list_controllers(&children_dir)? {
                naming::check_controller_name(&children_dir, &child)?;
                let mut child_lineage = lineage.clone();
                child_lineage.push(child.clone());
                queue.push_back(Pending {
                    dir: children_dir.join(&child),
                    lineage: child_lineage,
                });
            }
        }

        Ok(())
    }

    /// Collect every controller in visit order.
    pub fn walk(&self) -> RouteResult<Vec<ControllerDescriptor>> {
        let mut descriptors = Vec::new();
        self.walk_with(|descriptor| {
            descriptors.push(descriptor);
            Ok(())
        })?;
        Ok(descriptors)
    }

    fn load(
        &self,
        dir: PathBuf,
        lineage: Vec<String>,
        name_path: &[String],
    ) -> RouteResult<ControllerDescriptor> {
        let definition = self.loader.load(&dir, name_path)?;
        Ok(ControllerDescriptor::new(dir, lineage, definition, &self.main_view))
    }
}

/// Controller directory names under `dir`, sorted; empty if `dir` is absent.
fn list_controllers(dir: &Path) -> RouteResult<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let io_err = |source: std::io::Error| RouteError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if is_controller_name(&name) => names.push(name),
            Ok(name) => tracing::trace!(name = %name, "Skipping non-controller directory"),
            Err(name) => tracing::warn!(name = ?name, "Skipping non UTF-8 directory"),
        }
    }
    names.sort();
    Ok(names)
}

/// Controller directories have no dots and no whitespace.
fn is_controller_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c == '.' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_name_filter() {
        assert!(is_controller_name("blog"));
        assert!(is_controller_name("backbone-models"));
        assert!(!is_controller_name(".git"));
        assert!(!is_controller_name("index.toml"));
        assert!(!is_controller_name("my folder"));
        assert!(!is_controller_name(""));
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let names = list_controllers(Path::new("/definitely/not/a/dir")).unwrap();
        assert!(names.is_empty());
    }
}
