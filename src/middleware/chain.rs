use crate::controller::OwnerType;
use crate::middleware::{HandlerFuture, Next, SharedMiddleware};
use axum::{body::Body, http::Request};
use std::sync::Arc;

/// The composed chain for one registered route
///
/// Class middleware runs first, then method middleware, then the terminal
/// dispatch step which builds a fresh controller and calls the handler.
/// Cloning is cheap; every clone shares the same middleware list.
#[derive(Clone)]
pub struct RouteChain {
    middleware: Arc<[SharedMiddleware]>,
    owner: OwnerType,
    handler: Arc<str>,
}

impl RouteChain {
    pub fn new(
        class_middleware: &[SharedMiddleware],
        route_middleware: &[SharedMiddleware],
        owner: OwnerType,
        handler: &str,
    ) -> Self {
        let middleware: Vec<SharedMiddleware> = class_middleware
            .iter()
            .chain(route_middleware)
            .cloned()
            .collect();
        Self {
            middleware: middleware.into(),
            owner,
            handler: Arc::from(handler),
        }
    }

    /// Middleware in execution order, without the terminal step
    pub fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }

    pub fn owner(&self) -> OwnerType {
        self.owner
    }

    pub fn handler_name(&self) -> &str {
        &self.handler
    }

    /// Number of steps, terminal dispatch included
    pub fn len(&self) -> usize {
        self.middleware.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Run the chain for one request
    pub fn call(&self, request: Request<Body>) -> HandlerFuture {
        let owner = self.owner;
        let handler = Arc::clone(&self.handler);
        let mut next = Next::new(move |req| owner.dispatch(handler, req));

        // middleware[0] wraps (middleware[1] wraps ... (dispatch))
        for middleware in self.middleware.iter().rev() {
            let middleware = Arc::clone(middleware);
            let rest = next;
            next = Next::new(move |req| {
                Box::pin(async move { middleware.handle(req, rest).await })
            });
        }

        Box::pin(next.run(request))
    }
}

impl std::fmt::Debug for RouteChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteChain")
            .field("middleware", &self.middleware.len())
            .field("owner", &self.owner.name())
            .field("handler", &self.handler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Controller, RouteHandlers};
    use crate::middleware::{from_fn, shared};
    use crate::registry::RouteRegistry;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::Mutex;

    type Trail = Arc<Mutex<Vec<&'static str>>>;

    struct Probe;

    impl Controller for Probe {
        fn construct(_request: &Request<Body>) -> Self {
            Probe
        }
    }

    impl RouteHandlers for Probe {
        fn declare_routes(_registry: &mut RouteRegistry) {}

        fn invoke(self, handler: &str, _request: Request<Body>) -> HandlerFuture {
            let handler = handler.to_string();
            Box::pin(async move {
                if handler == "probe" {
                    Ok(StatusCode::OK.into_response())
                } else {
                    Ok(StatusCode::NOT_FOUND.into_response())
                }
            })
        }
    }

    fn label(trail: &Trail, name: &'static str) -> SharedMiddleware {
        let trail = Arc::clone(trail);
        shared(from_fn(move |req, next: Next| {
            let trail = Arc::clone(&trail);
            async move {
                trail.lock().unwrap().push(name);
                next.run(req).await
            }
        }))
    }

    #[tokio::test]
    async fn test_class_middleware_runs_before_route_middleware() {
        let trail: Trail = Arc::new(Mutex::new(Vec::new()));
        let chain = RouteChain::new(
            &[label(&trail, "class-1"), label(&trail, "class-2")],
            &[label(&trail, "route-1")],
            OwnerType::of::<Probe>(),
            "probe",
        );
        assert_eq!(chain.len(), 4);

        let response = chain.call(Request::new(Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*trail.lock().unwrap(), vec!["class-1", "class-2", "route-1"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let deny = shared(from_fn(|_req, _next: Next| async move {
            Ok(StatusCode::FORBIDDEN.into_response())
        }));
        let chain = RouteChain::new(&[deny], &[], OwnerType::of::<Probe>(), "other");
        let response = chain.call(Request::new(Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
