//! Middleware and extractors.

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod validation;
