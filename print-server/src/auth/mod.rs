//! Access control - shared-secret check and rate limiting

pub mod api_key;
pub mod rate_limit;

pub use api_key::{API_KEY_HEADER, ApiKey, authorize};
pub use rate_limit::{RateLimiter, print_rate_limit};
