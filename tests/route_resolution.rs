//! Route resolution over real controller trees.

use cadenza::config::RoutesConfig;
use cadenza::controller::{
    ConfiguredView, ControllerDefinition, ManifestLoader, RegistryLoader, ViewDefinition,
};
use cadenza::http::{handler, middleware, ActionRegistry, MiddlewareRegistry};
use cadenza::routing::{
    resolve_routes, BindingKind, ControllerWalker, RouteError, RouteTable, Verb,
};
use proptest::prelude::*;

mod common;

use common::AppTree;

fn resolve(tree: &AppTree, loader: RegistryLoader) -> Result<RouteTable, RouteError> {
    resolve_routes(
        tree.root(),
        &RoutesConfig::default(),
        loader,
        &MiddlewareRegistry::new(),
    )
}

fn paths(table: &RouteTable) -> Vec<String> {
    table
        .patterns()
        .into_iter()
        .map(|(verb, path)| format!("{verb} {path}"))
        .collect()
}

fn show() -> ControllerDefinition {
    ControllerDefinition::new().view("show", ViewDefinition::file("show.html"))
}

#[test]
fn test_breadth_first_order() {
    let tree = AppTree::new();
    let mut loader = RegistryLoader::new();
    for name_path in ["main", "b", "a", "a/x", "b/y", "a/x/z"] {
        tree.controller(name_path);
        loader.register(name_path, show());
    }

    let table = resolve(&tree, loader).unwrap();
    assert_eq!(
        paths(&table),
        vec![
            "GET /show",
            "GET /a/show",
            "GET /b/show",
            "GET /main/show",
            "GET /a/x/show",
            "GET /b/y/show",
            "GET /a/x/z/show",
        ]
    );
}

#[test]
fn test_depth_never_decreases_in_deep_tree() {
    let tree = AppTree::new();
    let mut loader = RegistryLoader::new().with("main", ControllerDefinition::new());
    tree.controller("main");
    for name_path in [
        "c", "a", "a/b", "a/b/c", "a/b/c/d", "a/b/c/d/e", "c/a", "c/a/z", "a/y", "a/y/x",
    ] {
        tree.controller(name_path);
        loader.register(name_path, ControllerDefinition::new());
    }

    let walker = ControllerWalker::new(tree.root(), "main", "index", loader);
    let visited = walker.walk().unwrap();
    let depths: Vec<_> = visited.iter().map(|d| d.depth()).collect();
    assert_eq!(depths, vec![0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5]);
    assert!(visited[0].is_root());

    let lineages: Vec<_> = visited.iter().map(|d| d.lineage().join("/")).collect();
    assert_eq!(
        lineages,
        vec![
            "", "a", "c", "main", "a/b", "a/y", "c/a", "a/b/c", "a/y/x", "c/a/z", "a/b/c/d",
            "a/b/c/d/e",
        ]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Node `i` hangs under the first level when `parents[i] % (i + 1)` is 0,
    /// otherwise under node `parents[i] % (i + 1) - 1`.
    #[test]
    fn test_depth_never_decreases_for_generated_trees(
        parents in prop::collection::vec(0usize..100, 0..20),
    ) {
        let tree = AppTree::new();
        tree.controller("main");
        let mut loader = RegistryLoader::new().with("main", ControllerDefinition::new());

        let mut name_paths: Vec<String> = Vec::with_capacity(parents.len());
        for (i, parent) in parents.iter().enumerate() {
            let name_path = match parent % (i + 1) {
                0 => format!("n{i}"),
                p => format!("{}/n{i}", name_paths[p - 1]),
            };
            tree.controller(&name_path);
            loader.register(&name_path, ControllerDefinition::new());
            name_paths.push(name_path);
        }

        let walker = ControllerWalker::new(tree.root(), "main", "index", loader);
        let visited = walker.walk().unwrap();
        prop_assert_eq!(visited.len(), parents.len() + 2);
        prop_assert!(visited[0].is_root());
        for pair in visited.windows(2) {
            prop_assert!(pair[0].depth() <= pair[1].depth());
        }
        for name_path in &name_paths {
            let depth = name_path.split('/').count();
            prop_assert!(visited
                .iter()
                .any(|d| d.lineage().join("/") == *name_path && d.depth() == depth));
        }
    }
}

#[test]
fn test_root_controller_with_aliases() {
    let tree = AppTree::new();
    tree.controller("main");
    let loader = RegistryLoader::new().with(
        "main",
        ControllerDefinition::new()
            .view("index", ViewDefinition::file("index.html"))
            .view(
                "login",
                ViewDefinition::configured(
                    ConfiguredView::file("login.html").custom_route("/signin"),
                ),
            ),
    );

    let table = resolve(&tree, loader).unwrap();
    assert_eq!(
        paths(&table),
        vec![
            "GET /index",
            "GET /login",
            "GET /signin",
            "GET /",
            "GET /main/index",
            "GET /main/login",
            "GET /signin",
            "GET /main/?",
        ]
    );

    let kinds: Vec<_> = table.bindings().iter().take(4).map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![BindingKind::Primary, BindingKind::Primary, BindingKind::Alias, BindingKind::Index]
    );
}

#[test]
fn test_nested_controller_without_main_view() {
    let tree = AppTree::new();
    tree.controller("main");
    tree.controller("blog/post");
    let enter = handler(|_cx| async { "entered" });
    let loader = RegistryLoader::new()
        .with("main", ControllerDefinition::new())
        .with("blog", ControllerDefinition::new())
        .with(
            "blog/post",
            ControllerDefinition::new().view("post:enter", ViewDefinition::action(enter)),
        );

    let table = resolve(&tree, loader).unwrap();
    assert_eq!(paths(&table), vec!["POST /blog/post/enter"]);
    assert_eq!(table.bindings()[0].controller, "blog/post");
}

#[test]
fn test_reserved_first_level_name_aborts() {
    let tree = AppTree::new();
    tree.controller("main");
    tree.controller("static");
    let loader = RegistryLoader::new()
        .with("main", show())
        .with("static", show());

    match resolve(&tree, loader) {
        Err(RouteError::InvalidControllerName { name, .. }) => assert_eq!(name, "static"),
        other => panic!("expected InvalidControllerName, got {other:?}"),
    }
}

#[test]
fn test_reserved_root_view_name() {
    let tree = AppTree::new();
    tree.controller("main");
    let loader = RegistryLoader::new().with(
        "main",
        ControllerDefinition::new().view("data", ViewDefinition::file("data.html")),
    );

    let err = resolve(&tree, loader).unwrap_err();
    assert!(matches!(err.root_cause(), RouteError::InvalidViewName { name, .. } if name == "data"));
}

#[test]
fn test_reserved_name_below_root_is_fine() {
    let tree = AppTree::new();
    tree.controller("main");
    tree.controller("admin/static");
    let loader = RegistryLoader::new()
        .with("main", ControllerDefinition::new())
        .with("admin", ControllerDefinition::new())
        .with(
            "admin/static",
            ControllerDefinition::new().view("data", ViewDefinition::file("data.html")),
        );

    let table = resolve(&tree, loader).unwrap();
    assert_eq!(paths(&table), vec!["GET /admin/static/data"]);
}

#[test]
fn test_missing_controller_definition() {
    let tree = AppTree::new();
    tree.controller("main");
    tree.controller("orphan");
    let loader = RegistryLoader::new().with("main", show());

    let err = resolve(&tree, loader).unwrap_err();
    assert!(matches!(err, RouteError::MissingControllerFile { .. }));
}

#[test]
fn test_bad_view_key_names_the_controller() {
    let tree = AppTree::new();
    let dir = tree.controller("main");
    let loader = RegistryLoader::new().with(
        "main",
        ControllerDefinition::new().view("fetch:thing", ViewDefinition::file("thing.html")),
    );

    match resolve(&tree, loader) {
        Err(RouteError::InController { path, source }) => {
            assert_eq!(path, dir);
            assert!(matches!(*source, RouteError::InvalidVerb { .. }));
        }
        other => panic!("expected InController, got {other:?}"),
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let tree = AppTree::new();
    let mut loader = RegistryLoader::new();
    for name_path in ["main", "zeta", "alpha", "alpha/one", "alpha/two"] {
        tree.controller(name_path);
        loader.register(name_path, show());
    }

    let first = resolve(&tree, loader.clone()).unwrap();
    let second = resolve(&tree, loader).unwrap();
    assert_eq!(first.patterns(), second.patterns());
}

#[test]
fn test_manifest_application() {
    let tree = AppTree::new();
    tree.manifest(
        "main",
        r#"
[views]
index = "index.html"
login = { file = "login.html", middlewares = ["not-logged"], custom_routes = "/signin" }
"#,
    );
    tree.manifest(
        "tools",
        r#"
main_view = "home"

[views]
home = { file = "home.html", params = ["id"] }
"put:echo" = { handler = "echo", params = [":text", "lang"], custom_routes = ["/return", "/answer"] }
"#,
    );

    let actions = ActionRegistry::new().with("echo", handler(|_cx| async { "echo" }));
    let middlewares = MiddlewareRegistry::new().with(
        "not-logged",
        middleware(|cx, next| async move { next(cx).await }),
    );
    let table = resolve_routes(
        tree.root(),
        &RoutesConfig::default(),
        ManifestLoader::new(actions),
        &middlewares,
    )
    .unwrap();

    let tools: Vec<_> = paths(&table)
        .into_iter()
        .filter(|p| p.contains("tools") || p.contains("/return") || p.contains("/answer"))
        .collect();
    assert_eq!(
        tools,
        vec![
            "GET /tools/home/:id",
            "PUT /tools/echo/:text/:lang",
            "PUT /return/:text/:lang",
            "PUT /answer/:text/:lang",
            "GET /tools/:id/?",
        ]
    );
    assert!(table
        .patterns()
        .contains(&(Verb::Get, "/signin")));
}

#[test]
fn test_unknown_middleware_fails() {
    let tree = AppTree::new();
    tree.manifest(
        "main",
        "[views]\nindex = { file = \"index.html\", middlewares = [\"auth\"] }\n",
    );

    let err = resolve_routes(
        tree.root(),
        &RoutesConfig::default(),
        ManifestLoader::default(),
        &MiddlewareRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::UnknownMiddleware { name, .. } if name == "auth"));
}

#[test]
fn test_router_syntax_in_view_name_fails() {
    let tree = AppTree::new();
    tree.manifest("main", "[views]\n\"*all\" = \"all.html\"\n");

    let err = resolve_routes(
        tree.root(),
        &RoutesConfig::default(),
        ManifestLoader::default(),
        &MiddlewareRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err.root_cause(), RouteError::MalformedViewKey { key, .. } if key == "*all"));
}

#[test]
fn test_router_syntax_in_controller_dir_fails() {
    let tree = AppTree::new();
    tree.controller("main");
    tree.controller("blog/a{b");
    let loader = RegistryLoader::new()
        .with("main", show())
        .with("blog", show())
        .with("blog/a{b", show());

    match resolve(&tree, loader) {
        Err(RouteError::InvalidControllerName { name, .. }) => assert_eq!(name, "a{b"),
        other => panic!("expected InvalidControllerName, got {other:?}"),
    }
}

#[test]
fn test_custom_route_on_reserved_segment_fails() {
    for route in ["/static", "/data/users", "/files/*rest"] {
        let tree = AppTree::new();
        tree.controller("main");
        let loader = RegistryLoader::new().with(
            "main",
            ControllerDefinition::new().view(
                "login",
                ViewDefinition::configured(ConfiguredView::file("login.html").custom_route(route)),
            ),
        );

        let err = resolve(&tree, loader).unwrap_err();
        assert!(
            matches!(err.root_cause(), RouteError::InvalidViewDefinition { key, .. } if key == "login"),
            "{route}: {err}"
        );
    }
}
