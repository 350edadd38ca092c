//! Domain error types for server operations.
//!
//! This module provides typed error variants for server-side operations,
//! following the rootcause pattern used across the workspace.

use std::fmt;

/// Server startup and request-translation errors.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration could not be loaded or is inconsistent.
    InvalidConfig { details: String },
    /// The listener could not be bound.
    Bind { addr: String, details: String },
    /// The server stopped with an error.
    Serve { details: String },
    /// A gate decision could not be turned into a response.
    InvalidRedirect { location: String, details: String },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { details } => write!(f, "invalid configuration: {}", details),
            Self::Bind { addr, details } => {
                write!(f, "failed to bind to '{}': {}", addr, details)
            }
            Self::Serve { details } => write!(f, "server error: {}", details),
            Self::InvalidRedirect { location, details } => {
                write!(f, "invalid redirect location '{}': {}", location, details)
            }
        }
    }
}

impl std::error::Error for ServerError {}
