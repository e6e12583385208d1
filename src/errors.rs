// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::graph::DependencyId;

#[derive(Error, Debug)]
pub enum TplwatchError {
    /// An edge was declared on a template the graph was never told about.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// A resolution referenced an edge id the template never handed out.
    #[error("Unknown dependency {id} on template '{template}'")]
    UnknownEdge { template: String, id: DependencyId },

    #[error("Invalid dependency declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Unbound render variable: {0}")]
    UnboundVariable(String),

    #[error("Render recursion limit exceeded while rendering '{0}'")]
    RecursionLimit(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TplwatchError>;
