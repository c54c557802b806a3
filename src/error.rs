// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for cellsan
//!
//! Unsafe markup is never an error: it is neutralized. Errors are reserved
//! for a parser that cannot produce a tree, bad policy configuration and
//! I/O around the CLI.

use thiserror::Error;

/// Result type alias for cellsan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cellsan
#[derive(Error, Debug)]
pub enum Error {
    /// The parse primitive could not produce a tree
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// Policy configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a parse failure
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::HtmlParse(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if the parser failed to produce a tree
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Error::HtmlParse(_))
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Serialization(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Prefix the error message with what was being attempted
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            Error::HtmlParse(inner) => Error::HtmlParse(format!("{}: {}", msg, inner)),
            Error::Config(inner) => Error::Config(format!("{}: {}", msg, inner)),
            other => Error::Other(format!("{}: {}", msg, other)),
        })
    }
}
