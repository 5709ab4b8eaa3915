#![allow(unreachable_pub, clippy::redundant_pub_crate)]
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use api_types::ErrorResponse;
use axum::{
    http::{HeaderValue, Request, header},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use tracing::warn;

use runtime::rate_limiter::RateLimiter;

#[derive(Clone, Debug)]
pub(super) struct RateLimitLayer {
    limiter: RateLimiter,
}

impl RateLimitLayer {
    pub fn new(max: u64, period: Duration) -> Self {
        Self { limiter: RateLimiter::new(max, period) }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimit { inner, limiter: self.limiter.clone() }
    }
}

#[derive(Clone, Debug)]
pub(super) struct RateLimit<S> {
    inner: S,
    limiter: RateLimiter,
}

fn too_many_requests(wait: Duration) -> Response {
    // Round up to whole seconds.
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    let mut body = ErrorResponse::rate_limited();
    body.detail = format!("Rate limit exceeded. Retry after {secs} seconds");

    let mut resp = body.into_response();
    resp.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
    resp
}

impl<S, ReqBody> Service<Request<ReqBody>> for RateLimit<S>
where
    S: Service<Request<ReqBody>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        match self.limiter.try_acquire() {
            Ok(()) => Box::pin(self.inner.call(req)),
            Err(wait) => {
                warn!(path = %req.uri().path(), "Rate limit exceeded");
                Box::pin(std::future::ready(Ok(too_many_requests(wait))))
            }
        }
    }
}
