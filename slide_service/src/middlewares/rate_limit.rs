use actix_governor::{
    governor::{
        clock::{Clock, DefaultClock, QuantaInstant},
        middleware::NoOpMiddleware,
        NotUntil,
    },
    GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError,
};
use actix_web::{
    dev::ServiceRequest,
    http::header::{self, ContentType},
    HttpResponse, HttpResponseBuilder,
};
use common::dtos::error_response::ErrorResponseDto;
use std::{net::IpAddr, time::Duration};
use tracing::warn;

const ONE_MINUTE: Duration = Duration::from_secs(60);

/// `actix_governor` configuration of one rate-limited route
pub type RouteRateLimit = GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("The `{route}` rate limit must allow at least one request per minute")]
pub struct ZeroRateLimitError {
    pub route: &'static str,
}

/// Quota of `max_requests` per client and per minute on `route`
///
/// The whole quota can be spent at once, then one request is given back every
/// `1 / max_requests` minute.
/// The configuration is shared by every worker: it must be built once, outside of the
/// `HttpServer::new` closure.
pub fn per_minute(
    route: &'static str,
    max_requests: u32,
) -> Result<RouteRateLimit, ZeroRateLimitError> {
    if max_requests == 0 {
        return Err(ZeroRateLimitError { route });
    }

    GovernorConfigBuilder::default()
        .period(ONE_MINUTE / max_requests)
        .burst_size(max_requests)
        .key_extractor(ClientIpKeyExtractor {
            route,
            max_requests,
        })
        .finish()
        .ok_or(ZeroRateLimitError { route })
}

/// Tells clients apart by the IP of the connection, forwarding headers can be forged
#[derive(Debug, Clone)]
pub struct ClientIpKeyExtractor {
    route: &'static str,
    max_requests: u32,
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        req.peer_addr()
            .map(|address| address.ip())
            .ok_or_else(|| SimpleKeyExtractionError::new("Could not identify the client"))
    }

    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        response: HttpResponseBuilder,
    ) -> HttpResponse {
        let wait = negative.wait_time_from(DefaultClock::default().now());
        let retry_after = retry_after_seconds(wait);
        warn!(
            route = self.route,
            retry_after_seconds = retry_after,
            "Rate limit exceeded"
        );

        too_many_requests(response, self.max_requests, retry_after)
    }
}

/// At least one second, rounded up
fn retry_after_seconds(wait: Duration) -> u64 {
    let seconds = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    seconds.max(1)
}

fn too_many_requests(
    mut response: HttpResponseBuilder,
    max_requests: u32,
    retry_after: u64,
) -> HttpResponse {
    let body = ErrorResponseDto::new(
        "RateLimitExceeded",
        format!("Rate limit exceeded: {} per minute", max_requests),
    )
    .with_detail("retry_after", retry_after);

    // Replaces the header set by the governor, which rounds down to zero
    response
        .insert_header(ContentType::json())
        .insert_header((header::RETRY_AFTER, retry_after.to_string()))
        .json(body)
}
