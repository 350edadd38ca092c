//! Core domain types and utilities for the sso-gate platform.
//!
//! This crate provides the foundational types shared between the gating
//! engine and its host: the rootcause `Result` alias, identity-provider
//! identifiers, and the named routes a gate decision can point at.

pub mod error;
pub mod provider;
pub mod route;

pub use error::Result;
pub use provider::ProviderId;
pub use route::{RouteName, paths};
