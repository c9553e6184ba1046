//! Application-layer rate limiting for print routes

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::warn;

use crate::core::AppState;

/// Length of a rate limit window
const WINDOW_SECS: u64 = 60;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window limiter keyed by route and client IP
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    /// route -> (IP -> entry)
    inner: Arc<Mutex<HashMap<String, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per minute; 0 disables it
    pub fn new(max_requests: u32) -> Self {
        Self {
            max_requests,
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(&self, route: &str, ip: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let mut map = self.inner.lock().await;
        let route_map = map.entry(route.to_owned()).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start).as_secs() >= WINDOW_SECS {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }

        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Client IP used as the limiter key
///
/// The peer address from `ConnectInfo` by default. `X-Forwarded-For` is
/// only honored when `trust_forwarded` is set, since any client can send it.
fn extract_ip(request: &Request, trust_forwarded: bool) -> String {
    if trust_forwarded
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn too_many_requests() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        axum::Json(serde_json::json!({"error": "Too many requests, try again later"})),
    )
        .into_response()
}

/// Rate limit middleware for print routes
pub async fn print_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let ip = extract_ip(&request, state.config.trust_forwarded_for);

    if !state.rate_limiter.check(&route, &ip).await {
        warn!(route = %route, ip = %ip, "Rate limit exceeded");
        return Err(too_many_requests());
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut request = axum::http::Request::builder().uri("/cut");
        if let Some(forwarded) = forwarded {
            request = request.header("x-forwarded-for", forwarded);
        }
        let mut request = request.body(axum::body::Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(axum::extract::ConnectInfo::<std::net::SocketAddr>(
                peer.parse().unwrap(),
            ));
        request
    }

    #[test]
    fn test_extract_ip_ignores_forwarded_by_default() {
        let request = request_from("192.168.1.20:5000", Some("10.9.9.1"));
        assert_eq!(extract_ip(&request, false), "192.168.1.20");
    }

    #[test]
    fn test_extract_ip_trusted_forwarded() {
        let request = request_from("192.168.1.20:5000", Some(" 10.9.9.1, 172.16.0.1"));
        assert_eq!(extract_ip(&request, true), "10.9.9.1");

        let request = request_from("192.168.1.20:5000", None);
        assert_eq!(extract_ip(&request, true), "192.168.1.20");
    }

    #[test]
    fn test_extract_ip_without_peer() {
        let request = axum::http::Request::builder()
            .uri("/cut")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request, false), "unknown");
    }

    #[tokio::test]
    async fn test_limit_per_route_and_ip() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.check("/print", "10.0.0.1").await);
        assert!(limiter.check("/print", "10.0.0.1").await);
        assert!(!limiter.check("/print", "10.0.0.1").await);

        // Other routes and clients have their own budget
        assert!(limiter.check("/cut", "10.0.0.1").await);
        assert!(limiter.check("/print", "10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_disabled_limiter_allows_everything() {
        let limiter = RateLimiter::new(0);
        for _ in 0..10 {
            assert!(limiter.check("/print", "10.0.0.1").await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check("/print", "10.0.0.1").await);
        assert!(!limiter.check("/print", "10.0.0.1").await);

        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        assert!(limiter.check("/print", "10.0.0.1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check("/print", "10.0.0.1").await);

        tokio::time::advance(std::time::Duration::from_secs(301)).await;
        limiter.cleanup().await;
        assert!(limiter.inner.lock().await.is_empty());
    }
}
