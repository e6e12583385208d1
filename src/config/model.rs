// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::graph::Target;
use crate::types::RenderMode;

/// Template manifest as read from a TOML file.
///
/// ```toml
/// [config]
/// watch_concurrent_renders = false
///
/// [template.base]
/// file = "templates/base.html"
///
/// [template.page]
/// extends = "base"
///
/// [[template.page.include]]
/// targets = ["missing", "$sidebar"]
/// ignore_missing = true
///
/// [[template.page.import]]
/// target = "macros"
/// as = "m"
/// ```
///
/// A target written as `"$name"` is dynamic: its name comes from the render
/// variable `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub config: ConfigSection,

    /// Keys are the template names the engine would use.
    #[serde(default)]
    pub template: BTreeMap<String, TemplateConfig>,
}

/// A manifest that passed validation. Build one with `Manifest::try_from`.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub config: ConfigSection,
    pub template: BTreeMap<String, TemplateConfig>,
}

impl Manifest {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        template: BTreeMap<String, TemplateConfig>,
    ) -> Self {
        Self { config, template }
    }

    pub fn get(&self, name: &str) -> Option<&TemplateConfig> {
        self.template.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.template.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.template.keys().map(|s| s.as_str())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Track resolutions of concurrent renders in watch sessions.
    #[serde(default)]
    pub watch_concurrent_renders: bool,

    /// How the engine runs renders (`"sync"` or `"concurrent"`).
    #[serde(default)]
    pub render_mode: RenderMode,
}

/// `[template.<name>]` section.
///
/// Edges are declared in a fixed order: `extends`, then every `include`,
/// then every `import`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// Source path, if the template lives in a file.
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default)]
    pub include: Vec<IncludeConfig>,

    #[serde(default)]
    pub import: Vec<ImportConfig>,
}

/// `[[template.<name>.include]]`
#[derive(Debug, Clone, Deserialize)]
pub struct IncludeConfig {
    /// Candidates tried in order; the first one that exists is rendered.
    pub targets: Vec<String>,

    #[serde(default = "default_true")]
    pub with_context: bool,

    #[serde(default)]
    pub ignore_missing: bool,
}

/// `[[template.<name>.import]]`
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub target: String,

    /// `import target as alias`
    #[serde(default, rename = "as")]
    pub alias: Option<String>,

    /// `from target import names...`
    #[serde(default)]
    pub names: Option<Vec<String>>,

    #[serde(default)]
    pub with_context: bool,
}

fn default_true() -> bool {
    true
}

/// A target as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    /// A literal template name.
    Static(String),
    /// `$variable`: the template name is read from a render variable.
    Variable(String),
}

impl TargetRef {
    /// Parse a manifest target. Returns `None` for an empty name or variable.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.strip_prefix('$') {
            Some("") => None,
            Some(var) => Some(TargetRef::Variable(var.to_string())),
            None if raw.is_empty() => None,
            None => Some(TargetRef::Static(raw.to_string())),
        }
    }

    /// The graph-level target this compiles to.
    pub fn to_target(&self) -> Target {
        match self {
            TargetRef::Static(name) => Target::named(name.clone()),
            TargetRef::Variable(_) => Target::dynamic(),
        }
    }
}
