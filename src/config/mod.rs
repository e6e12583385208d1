// src/config/mod.rs

//! Template manifests.
//!
//! A manifest describes a template tree the way a compiler front-end sees
//! it: which template extends, includes or imports which. The reference
//! engine compiles it into graph declarations.
//!
//! - `model.rs`: TOML-backed data model.
//! - `loader.rs`: reading a manifest from disk.
//! - `validate.rs`: semantic checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigSection, ImportConfig, IncludeConfig, Manifest, RawManifest, TargetRef, TemplateConfig,
};
pub use validate::validate_manifest;
