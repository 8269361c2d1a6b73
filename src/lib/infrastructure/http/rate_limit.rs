//! Per-client rate limiting

use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use super::errors::ApiError;

/// Rate limit configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct RateLimitConfig {
    /// Seconds needed to replenish one request slot
    #[arg(long, env = "RATE_LIMIT_PER_SECOND", default_value = "2")]
    pub rate_limit_per_second: u64,

    /// The number of requests allowed in a burst
    #[arg(long, env = "RATE_LIMIT_BURST", default_value = "5")]
    pub rate_limit_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_second: 2,
            rate_limit_burst: 5,
        }
    }
}

/// Body of a 429 response
#[derive(Debug, Serialize, Deserialize)]
pub struct TooManyRequestsResponse {
    /// Seconds until the next request is accepted
    pub retry_after: u64,
}

/// Rate limit error handler
pub fn rate_limit_error_handler(err: GovernorError) -> Response<Body> {
    match err {
        GovernorError::TooManyRequests { wait_time, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(TooManyRequestsResponse {
                retry_after: wait_time,
            }),
        )
            .into_response(),
        _ => ApiError::new_500("Internal Server Error").into_response(),
    }
}

/// Limits requests per client IP, honouring `X-Forwarded-For` and friends.
///
/// The router must be served with connection info so the peer address is
/// available when no forwarding header is present.
pub fn with_rate_limit(router: Router, config: &RateLimitConfig) -> anyhow::Result<Router> {
    let governor = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(config.rate_limit_per_second)
        .burst_size(config.rate_limit_burst)
        .error_handler(rate_limit_error_handler)
        .finish()
        .context("invalid rate limit configuration")?;

    Ok(router.layer(GovernorLayer {
        config: Arc::new(governor),
    }))
}
