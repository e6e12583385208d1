// src/graph/dependency.rs

//! Dependency edges and their resolution history.
//!
//! An edge is split in two:
//! - a [`Declaration`], the immutable description emitted at compile time.
//!   Two declarations are equal when kind, targets and attributes match,
//!   which is what makes recompiling a template idempotent.
//! - a [`Dependency`], which pairs a declaration with the append-only log of
//!   names it resolved to across every render.

use std::fmt;

use tracing::warn;

use crate::errors::{Result, TplwatchError};
use crate::graph::target::Target;
use crate::types::DependencyKind;

/// Handle for one edge of a template, handed out by
/// [`DependencyGraph::declare_dependency`](crate::graph::DependencyGraph::declare_dependency).
///
/// This is the position of the edge in its template's edge list. It stays
/// valid for the lifetime of the graph and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyId(pub usize);

impl DependencyId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an `import` binds the imported module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportBinding {
    /// `{% import 'macros' as m %}`
    Module(String),
    /// `{% from 'macros' import a, b %}`
    Names(Vec<String>),
}

/// Compile-time description of one dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    kind: DependencyKind,
    targets: Vec<Target>,
    with_context: Option<bool>,
    ignore_missing: Option<bool>,
    imported_as: Option<String>,
    imported_names: Option<Vec<String>>,
}

impl Declaration {
    /// Declaration with no kind-specific attributes.
    ///
    /// `extends` takes exactly one target; `include` and `import` take at
    /// least one (an include with several targets is a fallback list).
    pub fn new(kind: DependencyKind, targets: impl IntoIterator<Item = Target>) -> Result<Self> {
        let targets: Vec<Target> = targets.into_iter().collect();

        match (kind, targets.len()) {
            (_, 0) => {
                return Err(TplwatchError::InvalidDeclaration(format!(
                    "{kind} requires at least one target"
                )));
            }
            (DependencyKind::Extends, n) if n > 1 => {
                return Err(TplwatchError::InvalidDeclaration(format!(
                    "extends takes a single target (got {n})"
                )));
            }
            _ => {}
        }

        Ok(Self {
            kind,
            targets,
            with_context: None,
            ignore_missing: None,
            imported_as: None,
            imported_names: None,
        })
    }

    pub fn extends(target: Target) -> Self {
        Self {
            kind: DependencyKind::Extends,
            targets: vec![target],
            with_context: None,
            ignore_missing: None,
            imported_as: None,
            imported_names: None,
        }
    }

    /// An include, with the engine defaults: context passed, not optional.
    pub fn include(targets: impl IntoIterator<Item = Target>) -> Result<Self> {
        let mut decl = Self::new(DependencyKind::Include, targets)?;
        decl.with_context = Some(true);
        decl.ignore_missing = Some(false);
        Ok(decl)
    }

    /// An import, with the engine default of not passing the context.
    pub fn import(target: Target, binding: ImportBinding) -> Self {
        let (imported_as, imported_names) = match binding {
            ImportBinding::Module(alias) => (Some(alias), None),
            ImportBinding::Names(names) => (None, Some(names)),
        };

        Self {
            kind: DependencyKind::Import,
            targets: vec![target],
            with_context: Some(false),
            ignore_missing: None,
            imported_as,
            imported_names,
        }
    }

    /// Set whether the context is passed. Ignored on `extends`, which has
    /// no such attribute.
    pub fn with_context(mut self, with_context: bool) -> Self {
        if self.kind == DependencyKind::Extends {
            warn!("with_context does not apply to extends; ignored");
            return self;
        }
        self.with_context = Some(with_context);
        self
    }

    /// Set whether a missing target is tolerated. Ignored on anything but
    /// `include`.
    pub fn ignore_missing(mut self, ignore_missing: bool) -> Self {
        if self.kind != DependencyKind::Include {
            warn!(kind = %self.kind, "ignore_missing only applies to include; ignored");
            return self;
        }
        self.ignore_missing = Some(ignore_missing);
        self
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    /// All targets, in declaration order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The target of the edge if there is exactly one.
    pub fn target(&self) -> Option<&Target> {
        match self.targets.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    /// Whether the context is passed to the dependency (`include` / `import`).
    pub fn context_passed(&self) -> Option<bool> {
        self.with_context
    }

    /// Whether a missing target is tolerated (`include` only).
    pub fn missing_ignored(&self) -> Option<bool> {
        self.ignore_missing
    }

    /// The alias of `import ... as alias`.
    pub fn imported_as(&self) -> Option<&str> {
        self.imported_as.as_deref()
    }

    /// The names of `from ... import a, b`.
    pub fn imported_names(&self) -> Option<&[String]> {
        self.imported_names.as_deref()
    }

    /// True if any target is the static target `name`.
    pub fn targets_name(&self, name: &str) -> bool {
        self.targets.iter().any(|t| t.is_named(name))
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, target) in self.targets.iter().enumerate() {
            let sep = if i == 0 { " " } else { " | " };
            write!(f, "{sep}{target}")?;
        }
        Ok(())
    }
}

/// One name an edge resolved to during a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    name: String,
    in_current_watch: bool,
}

impl Resolution {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// False once a watch session was started after this resolution.
    pub fn in_current_watch(&self) -> bool {
        self.in_current_watch
    }
}

/// A declared edge plus every resolution recorded for it.
#[derive(Debug, Clone)]
pub struct Dependency {
    declaration: Declaration,
    resolutions: Vec<Resolution>,
}

impl Dependency {
    pub fn new(declaration: Declaration) -> Self {
        Self {
            declaration,
            resolutions: Vec::new(),
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn kind(&self) -> DependencyKind {
        self.declaration.kind
    }

    pub fn targets(&self) -> &[Target] {
        self.declaration.targets()
    }

    pub fn target(&self) -> Option<&Target> {
        self.declaration.target()
    }

    /// Record that a render reached `name` through this edge.
    ///
    /// Any name is accepted: a dynamic target cannot be checked ahead of time.
    pub fn resolve(&mut self, name: impl Into<String>) {
        self.resolutions.push(Resolution {
            name: name.into(),
            in_current_watch: true,
        });
    }

    /// Move every recorded resolution out of the current watch session.
    /// History is kept.
    pub fn reset_watch(&mut self) {
        for resolution in &mut self.resolutions {
            resolution.in_current_watch = false;
        }
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Every name this edge resolved to, in render order, duplicates included.
    pub fn resolved_names(&self) -> Vec<&str> {
        self.resolutions.iter().map(|r| r.name()).collect()
    }

    /// Names resolved since the last watch session started.
    pub fn resolved_names_in_current_watch(&self) -> Vec<&str> {
        self.resolutions
            .iter()
            .filter(|r| r.in_current_watch)
            .map(|r| r.name())
            .collect()
    }
}

/// Resolution history does not take part in equality.
impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.declaration == other.declaration
    }
}

impl Eq for Dependency {}

impl PartialEq<Declaration> for Dependency {
    fn eq(&self, other: &Declaration) -> bool {
        &self.declaration == other
    }
}
