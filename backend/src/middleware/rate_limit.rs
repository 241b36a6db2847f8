//! Request-limiting middleware.
//!
//! Every request is checked against the [`RateLimiter`] port before routing,
//! keyed by the peer IP address. Rejected requests get `429` with the shared
//! error envelope; limiter failures get `503`. Neither reaches a handler.
//! Paths under an exempt prefix bypass the limiter entirely.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::ports::RateLimiter;
use crate::domain::{Error as DomainError, RateLimitDecision};

/// Key used when the peer address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Message returned with `429` responses.
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests";

/// Middleware factory enforcing the per-client request cap.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use actix_web::App;
/// use speedtest::RateLimit;
/// use speedtest::domain::ports::FixtureRateLimiter;
///
/// let app = App::new().wrap(RateLimit::new(Arc::new(FixtureRateLimiter)));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<dyn RateLimiter>,
    exempt_prefixes: Rc<[String]>,
}

impl RateLimit {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            exempt_prefixes: Rc::from(Vec::new()),
        }
    }

    /// Let requests whose path starts with `prefix` through without counting
    /// them, e.g. orchestrator health probes.
    #[must_use]
    pub fn exempt_path_prefix(self, prefix: impl Into<String>) -> Self {
        let mut prefixes = self.exempt_prefixes.to_vec();
        prefixes.push(prefix.into());
        Self {
            limiter: self.limiter,
            exempt_prefixes: Rc::from(prefixes),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            exempt_prefixes: Rc::clone(&self.exempt_prefixes),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    exempt_prefixes: Rc<[String]>,
}

impl<S> RateLimitMiddleware<S> {
    fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.is_exempt(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let service = Rc::clone(&self.service);
        let limiter = Arc::clone(&self.limiter);

        Box::pin(async move {
            let client = client_key(&req);
            let rejection = match limiter.check(&client).await {
                Ok(RateLimitDecision::Allowed { .. }) => None,
                Ok(RateLimitDecision::Rejected { count }) => {
                    warn!(client = %client, count, path = req.path(), "rate limit exceeded");
                    Some(DomainError::too_many_requests(TOO_MANY_REQUESTS_MESSAGE))
                }
                Err(error) => Some(error),
            };

            match rejection {
                None => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Some(error) => {
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
