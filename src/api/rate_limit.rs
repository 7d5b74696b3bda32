//! Per-client rate limiting for speech synthesis
//!
//! Clients are keyed by peer IP address. Rendering is the only expensive
//! route, so the limiter is attached to it alone and the listing and health
//! routes stay open.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use super::ApiState;

/// Key used when the peer address is unknown
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// How often idle client entries are dropped
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Speech rate limiter keyed by client address
pub type SharedLimiter = Arc<DefaultKeyedRateLimiter<IpAddr>>;

/// Create a limiter granting each client `requests_per_minute`, with the same
/// burst capacity
pub fn create_limiter(requests_per_minute: u32) -> SharedLimiter {
    let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::keyed(Quota::per_minute(rpm)))
}

/// Address a request is charged to
///
/// Requests without connection info (e.g. an in-process service) share
/// one bucket.
pub fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(UNKNOWN_CLIENT, |ConnectInfo(addr)| addr.ip())
}

/// Reject a client's request once its budget is spent
pub async fn limit_by_client(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(ref limiter) = state.rate_limiter {
        let client = client_ip(&req);
        if limiter.check_key(&client).is_err() {
            tracing::warn!(%client, path = %req.uri().path(), "rate limit exceeded");
            return Err(StatusCode::TOO_MANY_REQUESTS);
        }
    }
    Ok(next.run(req).await)
}

/// Periodically forget clients whose budget has fully refilled
pub fn spawn_pruner(limiter: SharedLimiter) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            tracing::trace!(clients = limiter.len(), "pruned rate limiter");
        }
    })
}
