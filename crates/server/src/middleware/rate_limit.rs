//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the create endpoint is limited: ~10 registrations per minute per IP.
//! The client IP is the peer address unless `TRUSTED_PROXY` is set, in which
//! case the proxy's `X-Forwarded-For`/`X-Real-IP` headers are used.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::RateLimiter;
use governor::clock::{DefaultClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// How often idle keys are dropped from the limiter state.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Key extractor for the client IP.
///
/// Without `trust_proxy_headers` only the peer address counts, so a client
/// cannot pick its own bucket through headers. Requests with no peer address
/// (in-process tests, unix sockets) share the unspecified-address bucket.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy_headers: bool) -> Self {
        Self {
            trust_proxy_headers,
        }
    }

    fn from_proxy_headers<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        // First hop of X-Forwarded-For is the client
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = Self::from_proxy_headers(req)
        {
            return Ok(ip);
        }

        Ok(req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |info| info.0.ip()))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the rate limiter for registrations: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5. When
/// called inside a Tokio runtime, a background task prunes idle keys every
/// minute and stops once the layer is dropped.
///
/// # Panics
///
/// This function will not panic. `per_second(6)` and `burst_size(5)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn registration_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy_headers))
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");

    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        runtime.spawn(prune_idle_keys(Arc::downgrade(config.limiter())));
    } else {
        tracing::warn!("No Tokio runtime; rate limiter state will not be pruned");
    }

    GovernorLayer::new(Arc::new(config))
}

type IpRateLimiter = RateLimiter<
    IpAddr,
    DefaultKeyedStateStore<IpAddr>,
    DefaultClock,
    NoOpMiddleware<QuantaInstant>,
>;

async fn prune_idle_keys(limiter: Weak<IpRateLimiter>) {
    let mut interval = tokio::time::interval(PRUNE_INTERVAL);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(limiter) = limiter.upgrade() else {
            break;
        };
        limiter.retain_recent();
        tracing::debug!(keys = limiter.len(), "Pruned rate limiter state");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const PEER: &str = "192.0.2.9:51000";

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/customers");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut req = builder.body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(PEER.parse::<SocketAddr>().unwrap()));
        req
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_proxy_headers_ignored_by_default() {
        let extractor = ClientIpKeyExtractor::new(false);

        for headers in [
            [("x-forwarded-for", "203.0.113.7, 10.0.0.1")],
            [("x-real-ip", "198.51.100.4")],
        ] {
            assert_eq!(extractor.extract(&request(&headers)).unwrap(), ip("192.0.2.9"));
        }
    }

    #[test]
    fn test_trusted_proxy_headers() {
        let extractor = ClientIpKeyExtractor::new(true);

        let req = request(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(extractor.extract(&req).unwrap(), ip("203.0.113.7"));

        let req = request(&[("x-real-ip", "198.51.100.4")]);
        assert_eq!(extractor.extract(&req).unwrap(), ip("198.51.100.4"));

        // Unparseable header falls back to the peer
        let req = request(&[("x-forwarded-for", "unknown")]);
        assert_eq!(extractor.extract(&req).unwrap(), ip("192.0.2.9"));
    }

    #[test]
    fn test_missing_peer_address() {
        let req = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(
            ClientIpKeyExtractor::new(false).extract(&req).unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
