//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use cadenza::{Application, Shutdown};

/// An application tree in a unique temp directory, removed on drop.
pub struct AppTree {
    root: PathBuf,
}

impl AppTree {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("cadenza-it-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("app/controllers")).unwrap();
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the controller at `name_path` (`"blog/post"` lands in
    /// `app/controllers/blog/controllers/post`) and return its directory.
    pub fn controller(&self, name_path: &str) -> PathBuf {
        let mut dir = self.root.join("app/controllers");
        for (i, name) in name_path.split('/').enumerate() {
            if i > 0 {
                dir.push("controllers");
            }
            dir.push(name);
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write the `index.toml` manifest of `name_path`.
    pub fn manifest(&self, name_path: &str, toml: &str) -> &Self {
        let dir = self.controller(name_path);
        fs::write(dir.join("index.toml"), toml).unwrap();
        self
    }

    /// Write a template into the `views/` directory of `name_path`.
    pub fn view(&self, name_path: &str, file: &str, contents: &str) -> &Self {
        let dir = self.controller(name_path).join("views");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
        self
    }

    /// Write any file relative to the root.
    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
        self
    }
}

impl Drop for AppTree {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Serve `app` on an ephemeral local port.
pub async fn start_app(app: Application) -> (SocketAddr, Shutdown) {
    let listener = app.bind(Some("127.0.0.1:0")).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        app.serve(listener, receiver).await.unwrap();
    });
    (addr, shutdown)
}

/// A client that never pools connections, so shutdown is prompt.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
