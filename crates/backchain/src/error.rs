//! Error types for the inference engine

use crate::logic::SubstitutionError;
use std::io;
use thiserror::Error;

/// Errors surfaced to the caller.
///
/// A goal that simply cannot be proven is not an error: the query returns an
/// empty solution list and a trace of the failed attempts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid predicate name {0:?}: {1}")]
    InvalidPredicate(String, &'static str),

    #[error("Malformed clause: {0}")]
    MalformedClause(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Every clause renaming needs a fresh generation and the counter ran out
    #[error("Variable generation counter exhausted")]
    GenerationOverflow,

    /// A substitution invariant broke during search; this is a bug, not bad input
    #[error("Internal invariant violated: {0}")]
    Internal(SubstitutionError),
}

pub type Result<T> = std::result::Result<T, Error>;
