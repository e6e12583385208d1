#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use tplwatch::config::{
    ConfigSection, ImportConfig, IncludeConfig, Manifest, RawManifest, TemplateConfig,
};
use tplwatch::types::RenderMode;

/// Builder for `Manifest` to simplify test setup.
pub struct ManifestBuilder {
    manifest: RawManifest,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            manifest: RawManifest {
                config: ConfigSection::default(),
                template: BTreeMap::new(),
            },
        }
    }

    pub fn with_template(mut self, name: &str, template: TemplateConfig) -> Self {
        self.manifest.template.insert(name.to_string(), template);
        self
    }

    /// A template with no dependencies.
    pub fn with_leaf(self, name: &str) -> Self {
        self.with_template(name, TemplateBuilder::new().build())
    }

    pub fn watch_concurrent_renders(mut self, val: bool) -> Self {
        self.manifest.config.watch_concurrent_renders = val;
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.manifest.config.render_mode = mode;
        self
    }

    pub fn build(self) -> Manifest {
        Manifest::try_from(self.manifest).expect("Failed to build valid manifest from builder")
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TemplateConfig`.
pub struct TemplateBuilder {
    template: TemplateConfig,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            template: TemplateConfig::default(),
        }
    }

    pub fn file(mut self, path: &str) -> Self {
        self.template.file = Some(PathBuf::from(path));
        self
    }

    pub fn extends(mut self, target: &str) -> Self {
        self.template.extends = Some(target.to_string());
        self
    }

    /// `include target` with engine defaults (with context, not optional).
    pub fn include(self, target: &str) -> Self {
        self.include_with(&[target], true, false)
    }

    pub fn include_with(mut self, targets: &[&str], with_context: bool, ignore_missing: bool) -> Self {
        self.template.include.push(IncludeConfig {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            with_context,
            ignore_missing,
        });
        self
    }

    /// `import target as alias`
    pub fn import_as(mut self, target: &str, alias: &str, with_context: bool) -> Self {
        self.template.import.push(ImportConfig {
            target: target.to_string(),
            alias: Some(alias.to_string()),
            names: None,
            with_context,
        });
        self
    }

    /// `from target import names...`
    pub fn import_names(mut self, target: &str, names: &[&str], with_context: bool) -> Self {
        self.template.import.push(ImportConfig {
            target: target.to_string(),
            alias: None,
            names: Some(names.iter().map(|n| n.to_string()).collect()),
            with_context,
        });
        self
    }

    pub fn build(self) -> TemplateConfig {
        self.template
    }
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render variables from `(key, value)` pairs.
pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
