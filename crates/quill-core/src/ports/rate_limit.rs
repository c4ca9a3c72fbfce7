//! Rate limiting port.

use std::time::Duration;

/// Rate limiter trait - abstraction over rate limiting backends.
///
/// The check is synchronous so it can run inside request middleware
/// without blocking on a future.
pub trait RateLimiter: Send + Sync {
    /// Record a request for `key` and report whether it is allowed.
    fn check(&self, key: &str) -> RateLimitResult;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub retry_after: Duration,
}
