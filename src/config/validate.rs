// src/config/validate.rs

use crate::config::model::{ImportConfig, IncludeConfig, Manifest, RawManifest, TargetRef};
use crate::errors::{Result, TplwatchError};

impl TryFrom<RawManifest> for Manifest {
    type Error = TplwatchError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_manifest(&raw)?;
        Ok(Manifest::new_unchecked(raw.config, raw.template))
    }
}

/// Semantic checks on a deserialized manifest.
///
/// Static targets naming templates absent from the manifest are fine: the
/// graph never validates names, and the engine reports them at render time.
pub fn validate_manifest(raw: &RawManifest) -> Result<()> {
    ensure_has_templates(raw)?;

    for (name, tpl) in raw.template.iter() {
        if name.trim().is_empty() {
            return Err(config_error("template names must not be empty"));
        }
        if let Some(parent) = &tpl.extends {
            ensure_target(name, "extends", parent)?;
        }
        for include in tpl.include.iter() {
            validate_include(name, include)?;
        }
        for import in tpl.import.iter() {
            validate_import(name, import)?;
        }
    }

    Ok(())
}

fn ensure_has_templates(raw: &RawManifest) -> Result<()> {
    if raw.template.is_empty() {
        return Err(config_error(
            "manifest must contain at least one [template.<name>] section",
        ));
    }
    Ok(())
}

fn validate_include(owner: &str, include: &IncludeConfig) -> Result<()> {
    if include.targets.is_empty() {
        return Err(config_error(format!(
            "template '{owner}' has an include with no targets"
        )));
    }
    for target in include.targets.iter() {
        ensure_target(owner, "include", target)?;
    }
    Ok(())
}

fn validate_import(owner: &str, import: &ImportConfig) -> Result<()> {
    ensure_target(owner, "import", &import.target)?;

    match (&import.alias, &import.names) {
        (Some(_), Some(_)) => Err(config_error(format!(
            "template '{owner}' imports '{}' with both `as` and `names`",
            import.target
        ))),
        (None, None) => Err(config_error(format!(
            "template '{owner}' imports '{}' without `as` or `names`",
            import.target
        ))),
        (None, Some(names)) if names.is_empty() => Err(config_error(format!(
            "template '{owner}' imports no names from '{}'",
            import.target
        ))),
        _ => Ok(()),
    }
}

fn ensure_target(owner: &str, kind: &str, raw: &str) -> Result<TargetRef> {
    TargetRef::parse(raw).ok_or_else(|| {
        config_error(format!(
            "template '{owner}' has an empty {kind} target ({raw:?})"
        ))
    })
}

fn config_error(msg: impl Into<String>) -> TplwatchError {
    TplwatchError::ConfigError(msg.into())
}
