// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::RenderMode;

/// Command-line arguments for `tplwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tplwatch",
    version,
    about = "Inspect template dependencies and what a render actually used.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the template manifest (TOML).
    #[arg(long, value_name = "PATH", default_value = "Tplwatch.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TPLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compile every template and print the declared dependencies.
    List,

    /// Print the templates whose output depends on NAME through static edges.
    Affected {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Render NAME inside a watch session and print the templates it used.
    Render {
        #[arg(value_name = "NAME")]
        name: String,

        /// Render variable used by dynamic targets, as `key=value`.
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Override `[config].render_mode` (sync or concurrent).
        #[arg(long, value_name = "MODE")]
        mode: Option<RenderMode>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid variable {raw:?} (expected KEY=VALUE)")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
