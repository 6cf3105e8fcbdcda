//! CLI support for fieldcheck
//!
//! Provides programmatic access to the CLI commands so they can be embedded
//! in other tools and tested without spawning a process.

mod check;
mod docs;

pub use check::{
    CheckOptions, CheckReport, EvalOptions, EvalResult, execute_check, execute_eval, parse_field_spec,
};
pub use docs::{get_doc_topic, get_docs_overview, lookup_table};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Invalid constraint: {0}")]
    Declaration(#[from] crate::DeclarationError),

    #[error("Invalid record: {0}")]
    Record(#[from] crate::RecordError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::ConfigError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid field declaration '{0}' (expected name:type)")]
    FieldSpec(String),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Unknown topic: '{0}'\nRun 'fieldcheck docs' to see available topics.")]
    UnknownTopic(String),
}
