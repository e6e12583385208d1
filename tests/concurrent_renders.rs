mod common;

use common::init_tracing;
use tplwatch::engine::Engine;
use tplwatch::{Declaration, DependencyId, RenderMode, SharedDependencyGraph, Target};
use tplwatch_test_utils::builders::{vars, ManifestBuilder, TemplateBuilder};
use tplwatch_test_utils::with_timeout;

/// `home` includes `header`, `about` includes `footer`.
fn shared_graph() -> (SharedDependencyGraph, DependencyId, DependencyId) {
    init_tracing();
    let shared = SharedDependencyGraph::default();
    for name in ["home", "about", "header", "footer"] {
        shared.declare_template(name, None);
    }
    let home = shared
        .declare_dependency("home", Declaration::include([Target::named("header")]).unwrap())
        .unwrap();
    let about = shared
        .declare_dependency("about", Declaration::include([Target::named("footer")]).unwrap())
        .unwrap();
    (shared, home, about)
}

/// Simulated async render: resolves `id` of `owner` a few times, yielding in between.
async fn render(shared: SharedDependencyGraph, owner: &'static str, id: DependencyId, target: &'static str) {
    for _ in 0..3 {
        shared
            .resolve_dependency(RenderMode::Concurrent, owner, id, target)
            .unwrap();
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_concurrent_renders_are_not_tracked_by_default() {
    with_timeout(async {
        let (shared, home, about) = shared_graph();
        shared.start_watch();

        let a = tokio::spawn(render(shared.clone(), "home", home, "header"));
        let b = tokio::spawn(render(shared.clone(), "about", about, "footer"));
        a.await.unwrap();
        b.await.unwrap();

        assert!(shared.used_in_current_watch().is_empty());
        let graph = shared.lock();
        let home_tpl = graph.get_template("home").unwrap();
        assert!(home_tpl.dependencies()[0].resolved_names().is_empty());
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opt_in_interleaves_overlapping_renders() {
    with_timeout(async {
        let (shared, home, about) = shared_graph();
        shared.lock().set_watch_concurrent_renders(true);
        shared.start_watch();

        let a = tokio::spawn(render(shared.clone(), "home", home, "header"));
        let b = tokio::spawn(render(shared.clone(), "about", about, "footer"));
        a.await.unwrap();
        b.await.unwrap();

        // Both renders land in the same session; nothing tells them apart.
        let mut used = shared.used_in_current_watch();
        used.sort();
        assert_eq!(used, vec!["footer", "header"]);

        let graph = shared.lock();
        let home_tpl = graph.get_template("home").unwrap();
        assert_eq!(home_tpl.dependencies()[0].resolved_names().len(), 3);
    })
    .await;
}

#[tokio::test]
async fn test_sync_renders_through_shared_graph_are_tracked() {
    with_timeout(async {
        let (shared, home, _) = shared_graph();
        shared.start_watch();
        shared
            .resolve_dependency(RenderMode::Sync, "home", home, "header")
            .unwrap();
        assert_eq!(shared.used_in_current_watch(), vec!["header"]);
    })
    .await;
}

#[test]
fn test_engine_in_concurrent_mode_honours_the_flag() {
    init_tracing();
    let build = |watch: bool| {
        ManifestBuilder::new()
            .with_leaf("header")
            .with_template("home", TemplateBuilder::new().include("header").build())
            .render_mode(RenderMode::Concurrent)
            .watch_concurrent_renders(watch)
            .build()
    };

    let mut untracked = Engine::new(build(false));
    untracked.render("home", &vars(&[])).unwrap();
    let home = untracked.graph().get_template("home").unwrap();
    assert_eq!(home.dependencies().len(), 1);
    assert!(home.dependencies()[0].resolved_names().is_empty());

    let mut tracked = Engine::new(build(true));
    tracked.render("home", &vars(&[])).unwrap();
    let home = tracked.graph().get_template("home").unwrap();
    assert_eq!(home.dependencies()[0].resolved_names(), vec!["header"]);
}

#[test]
fn test_graph_stays_usable_after_a_holder_panics() {
    init_tracing();
    let (shared, home_id, _) = shared_graph();
    shared.start_watch();

    let poisoner = shared.clone();
    let joined = std::thread::spawn(move || {
        let _guard = poisoner.lock();
        panic!("render failed while holding the graph");
    })
    .join();
    assert!(joined.is_err());

    shared.declare_template("late", None);
    shared
        .resolve_dependency(RenderMode::Sync, "home", home_id, "header")
        .unwrap();

    assert!(shared.lock().get_template("late").is_some());
    assert_eq!(shared.used_in_current_watch(), vec!["header"]);
}
