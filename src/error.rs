// src/error.rs

//! Crate-wide error types.
//!
//! Missing packages and truncated expansions are deliberately not errors:
//! a dependency graph with gaps or cycles is valid diagnostic output and is
//! modeled as data on the resolution result instead.

use thiserror::Error;

/// Errors surfaced by the index source, parser, and resolver
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure: DNS, connection, timeout, or non-2xx status
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Undecodable bytes, malformed archive, or missing archive member
    #[error("Format error: {0}")]
    FormatError(String),

    /// Local file unreadable
    #[error("I/O error: {0}")]
    IoError(String),

    /// Contract violation such as an empty root package name
    #[error("Initialization error: {0}")]
    InitError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
