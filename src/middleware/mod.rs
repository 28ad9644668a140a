use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

mod chain;
mod logging;

pub use chain::RouteChain;
pub use logging::RequestLogger;

/// Result returned by every step of a route chain
pub type MiddlewareResult = Result<Response, MiddlewareError>;

/// A type-erased error for middleware and handlers
pub type MiddlewareError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future produced by a chain step
pub type HandlerFuture = Pin<Box<dyn Future<Output = MiddlewareResult> + Send>>;

/// Middleware as stored in route declarations
pub type SharedMiddleware = Arc<dyn Middleware>;

/// Represents the rest of the route chain
pub struct Next {
    run: Box<dyn FnOnce(Request<Body>) -> HandlerFuture + Send>,
}

impl Next {
    /// Create a new Next step
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> HandlerFuture + Send + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Continue with the rest of the chain
    pub async fn run(self, request: Request<Body>) -> MiddlewareResult {
        (self.run)(request).await
    }
}

/// A route middleware
///
/// Middleware sees the request before the controller does and the response
/// after it. Returning without calling `next.run` short-circuits the chain.
///
/// # Example
/// ```
/// use route_mapping::middleware::{Middleware, MiddlewareResult, Next};
/// use route_mapping::async_trait;
/// use axum::{body::Body, http::Request};
///
/// struct RequireJson;
///
/// #[async_trait]
/// impl Middleware for RequireJson {
///     async fn handle(&self, req: Request<Body>, next: Next) -> MiddlewareResult {
///         if req.headers().contains_key("content-type") {
///             next.run(req).await
///         } else {
///             Err("missing content-type".into())
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, request: Request<Body>, next: Next) -> MiddlewareResult;
}

/// Middleware built from an async closure, see [`from_fn`]
pub struct FromFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult> + Send + 'static,
{
    async fn handle(&self, request: Request<Body>, next: Next) -> MiddlewareResult {
        (self.f)(request, next).await
    }
}

/// Wrap an async closure `(request, next) -> MiddlewareResult` as middleware
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult> + Send + 'static,
{
    FromFn { f }
}

/// Erase a middleware value into the shared form used by declarations
pub fn shared<M: Middleware>(middleware: M) -> SharedMiddleware {
    Arc::new(middleware)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn ok_next() -> Next {
        Next::new(|_req| Box::pin(async { Ok(StatusCode::OK.into_response()) }))
    }

    #[tokio::test]
    async fn test_from_fn_continues_chain() {
        let mw = from_fn(|req, next: Next| async move { next.run(req).await });
        let response = mw.handle(Request::new(Body::empty()), ok_next()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_from_fn_short_circuits() {
        let mw = from_fn(|_req, _next: Next| async move {
            Ok(StatusCode::UNAUTHORIZED.into_response())
        });
        let response = mw.handle(Request::new(Body::empty()), ok_next()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
