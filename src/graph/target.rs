// src/graph/target.rs

use std::fmt;

/// The endpoint of a dependency edge.
///
/// A target is dynamic when the template computes its name at render time
/// (`{% include some_variable %}`), in which case the name is unknown until
/// the edge is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    name: Option<String>,
}

impl Target {
    /// A target whose name is written literally in the template source.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// A target whose name is only known once the template renders.
    pub fn dynamic() -> Self {
        Self { name: None }
    }

    pub fn is_dynamic(&self) -> bool {
        self.name.is_none()
    }

    /// The name of the target template, or `None` if the target is dynamic.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True if this is the static target `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name:?}"),
            None => f.write_str("<dynamic>"),
        }
    }
}
