mod common;

use std::io::Write;

use common::init_tracing;
use tempfile::NamedTempFile;
use tplwatch::config::load_and_validate;
use tplwatch::engine::{Engine, MAX_RENDER_DEPTH};
use tplwatch::errors::TplwatchError;
use tplwatch::{Declaration, RenderMode, Target};
use tplwatch_test_utils::builders::{vars, ManifestBuilder, TemplateBuilder};

fn manifest_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_valid_manifest_loads() {
    let file = manifest_file(
        r#"
[config]
watch_concurrent_renders = true
render_mode = "concurrent"

[template.base]
file = "templates/base.html"

[template.page]
extends = "base"

[[template.page.include]]
targets = ["missing", "$sidebar"]
ignore_missing = true

[[template.page.import]]
target = "macros"
as = "m"
"#,
    );

    let manifest = load_and_validate(file.path()).unwrap();
    assert!(manifest.config.watch_concurrent_renders);
    assert_eq!(manifest.config.render_mode, RenderMode::Concurrent);

    let page = manifest.get("page").unwrap();
    assert_eq!(page.extends.as_deref(), Some("base"));
    assert!(page.include[0].with_context);
    assert!(page.include[0].ignore_missing);
    assert_eq!(page.import[0].alias.as_deref(), Some("m"));
    assert!(!page.import[0].with_context);
}

#[test]
fn test_empty_manifest_returns_config_error() {
    let file = manifest_file("[config]\n");

    match load_and_validate(file.path()) {
        Err(TplwatchError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_include_without_targets_returns_config_error() {
    let file = manifest_file(
        r#"
[template.page]

[[template.page.include]]
targets = []
"#,
    );

    match load_and_validate(file.path()) {
        Err(TplwatchError::ConfigError(msg)) => {
            assert!(msg.contains("page"));
            assert!(msg.contains("no targets"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_import_with_two_bindings_returns_config_error() {
    let file = manifest_file(
        r#"
[template.page]

[[template.page.import]]
target = "macros"
as = "m"
names = ["a"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TplwatchError::ConfigError(msg)) => assert!(msg.contains("both")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_variable_target_returns_config_error() {
    let file = manifest_file(
        r#"
[template.page]
extends = "$"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TplwatchError::ConfigError(_))
    ));
}

#[test]
fn test_invalid_render_mode_returns_toml_error() {
    let file = manifest_file(
        r#"
[config]
render_mode = "sometimes"

[template.page]
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TplwatchError::TomlError(_))
    ));
}

#[test]
fn test_missing_manifest_returns_io_error() {
    assert!(matches!(
        load_and_validate("definitely/not/here/Tplwatch.toml"),
        Err(TplwatchError::IoError(_))
    ));
}

#[test]
fn test_empty_include_declaration_is_rejected() {
    let result = Declaration::include(Vec::<Target>::new());
    assert!(matches!(result, Err(TplwatchError::InvalidDeclaration(_))));
}

#[test]
fn test_render_errors() {
    init_tracing();
    let manifest = ManifestBuilder::new()
        .with_template("broken", TemplateBuilder::new().include("nope").build())
        .with_template("unbound", TemplateBuilder::new().extends("$layout").build())
        .with_template("loop_a", TemplateBuilder::new().include("loop_b").build())
        .with_template("loop_b", TemplateBuilder::new().include("loop_a").build())
        .build();
    let mut engine = Engine::new(manifest);
    let no_vars = vars(&[]);

    match engine.render("broken", &no_vars) {
        Err(TplwatchError::TemplateNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("Expected TemplateNotFound, got: {:?}", other),
    }

    match engine.render("unbound", &no_vars) {
        Err(TplwatchError::UnboundVariable(var)) => assert_eq!(var, "layout"),
        other => panic!("Expected UnboundVariable, got: {:?}", other),
    }

    assert!(matches!(
        engine.render("not_in_manifest", &no_vars),
        Err(TplwatchError::TemplateNotFound(_))
    ));

    assert!(matches!(
        engine.render("loop_a", &no_vars),
        Err(TplwatchError::RecursionLimit(_))
    ));
    // Each hop was recorded before the limit was hit.
    let loop_a = engine.graph().get_template("loop_a").unwrap();
    assert!(loop_a.dependencies()[0].resolved_names().len() >= MAX_RENDER_DEPTH / 2);
}

fn include_chain(levels: usize) -> Engine {
    let mut builder = ManifestBuilder::new();
    for i in 0..levels - 1 {
        let next = format!("level{}", i + 1);
        builder = builder.with_template(&format!("level{i}"), TemplateBuilder::new().include(&next).build());
    }
    builder = builder.with_leaf(&format!("level{}", levels - 1));
    Engine::new(builder.build())
}

#[test]
fn test_render_depth_limit_is_exact() {
    init_tracing();
    let no_vars = vars(&[]);

    let mut at_limit = include_chain(MAX_RENDER_DEPTH);
    at_limit.render("level0", &no_vars).unwrap();

    let mut past_limit = include_chain(MAX_RENDER_DEPTH + 1);
    match past_limit.render("level0", &no_vars) {
        Err(TplwatchError::RecursionLimit(name)) => {
            assert_eq!(name, format!("level{MAX_RENDER_DEPTH}"))
        }
        other => panic!("Expected RecursionLimit, got: {:?}", other),
    }
}
