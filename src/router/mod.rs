//! Route table bootstrap
//!
//! [`init_router`] turns the declarations held by a [`RouteRegistry`] into
//! registrations on a [`HostRouter`]:
//!
//! ```text
//! for each segment (first-declaration order)
//!   for each entry (declaration order)
//!     class     = class_descriptors[entry.owner_name]
//!     full path = options.prefix + class.path_prefix + segment
//!     chain     = class.middleware + entry.middleware + dispatch
//!     host.route(entry.method, full path, chain)
//! ```

use crate::config::RouterOptions;
use crate::error::{Result, RouteError};
use crate::method::HttpMethod;
use crate::middleware::RouteChain;
use crate::registry::RouteRegistry;

mod axum_host;

pub use axum_host::AxumHost;

/// A router that composed routes are registered with
pub trait HostRouter {
    /// Register `chain` for `method` at the literal `path`
    ///
    /// `path` is passed through untouched. Whether a repeated method and path
    /// replaces the earlier registration is up to the implementation.
    fn route(&mut self, method: HttpMethod, path: &str, chain: RouteChain) -> Result<()>;
}

impl<H: HostRouter + ?Sized> HostRouter for &mut H {
    fn route(&mut self, method: HttpMethod, path: &str, chain: RouteChain) -> Result<()> {
        (**self).route(method, path, chain)
    }
}

/// Register every declared route with `host`
///
/// Returns the number of routes registered. Calling it again registers
/// every route again.
///
/// # Errors
/// - [`RouteError::UninitializedRegistry`] if no class route or no method route was declared
/// - [`RouteError::UnresolvedOwner`] if a method route's controller has no class route
/// - any error returned by [`HostRouter::route`]
pub fn init_router<H>(host: &mut H, registry: &RouteRegistry, options: &RouterOptions) -> Result<usize>
where
    H: HostRouter + ?Sized,
{
    let classes = registry
        .class_descriptors()
        .ok_or(RouteError::UninitializedRegistry {
            missing: "class route",
        })?;
    let groups = registry
        .route_entries()
        .ok_or(RouteError::UninitializedRegistry {
            missing: "method route",
        })?;

    let mut registered = 0;
    for group in groups {
        for entry in group.entries() {
            let class = classes.get(entry.owner_name()).ok_or_else(|| {
                RouteError::UnresolvedOwner {
                    owner: entry.owner_name().to_string(),
                    handler: entry.handler_name().to_string(),
                    segment: group.segment().to_string(),
                }
            })?;

            let full_path = format!("{}{}{}", options.prefix, class.path_prefix(), group.segment());
            let chain = RouteChain::new(
                class.middleware(),
                entry.middleware(),
                entry.owner(),
                entry.handler_name(),
            );

            tracing::info!(
                method = %entry.method(),
                path = %full_path,
                controller = entry.owner_name(),
                handler = entry.handler_name(),
                "{}",
                register_line(entry.method(), &full_path, entry.owner_name(), entry.handler_name())
            );
            host.route(entry.method(), &full_path, chain)?;
            registered += 1;
        }
    }

    registry.mark_initialized();
    tracing::info!(
        "Route table initialized ({} routes, anchor {})",
        registered,
        registry.anchor().unwrap_or("-")
    );
    Ok(registered)
}

/// Diagnostic line emitted for each registration
fn register_line(method: HttpMethod, path: &str, owner: &str, handler: &str) -> String {
    format!("register URL * {} {} * {}.{}", method, path, owner, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{unknown_handler, ClassRoute, Controller, RouteHandlers};
    use crate::middleware::{from_fn, shared, HandlerFuture, Next, SharedMiddleware};
    use crate::registry::RegistryPhase;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::{body::Body, http::Request};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingRouter {
        routes: Vec<(HttpMethod, String, RouteChain)>,
    }

    impl HostRouter for RecordingRouter {
        fn route(&mut self, method: HttpMethod, path: &str, chain: RouteChain) -> Result<()> {
            self.routes.push((method, path.to_string(), chain));
            Ok(())
        }
    }

    impl RecordingRouter {
        fn registered(&self) -> Vec<(String, String)> {
            self.routes
                .iter()
                .map(|(method, path, _)| (method.to_string(), path.clone()))
                .collect()
        }
    }

    struct RefusingRouter;

    impl HostRouter for RefusingRouter {
        fn route(&mut self, method: HttpMethod, path: &str, _chain: RouteChain) -> Result<()> {
            Err(RouteError::UnsupportedMethod {
                method,
                path: path.to_string(),
            })
        }
    }

    type Trail = Arc<Mutex<Vec<String>>>;

    fn label(trail: &Trail, name: &'static str) -> SharedMiddleware {
        let trail = Arc::clone(trail);
        shared(from_fn(move |req, next: Next| {
            let trail = Arc::clone(&trail);
            async move {
                trail.lock().unwrap().push(name.to_string());
                next.run(req).await
            }
        }))
    }

    struct UserController;

    impl Controller for UserController {
        fn construct(_request: &Request<Body>) -> Self {
            UserController
        }
    }

    impl RouteHandlers for UserController {
        fn declare_routes(_registry: &mut RouteRegistry) {}

        fn invoke(self, handler: &str, _request: Request<Body>) -> HandlerFuture {
            match handler {
                "get_user" => Box::pin(async { Ok("user".into_response()) }) as HandlerFuture,
                _ => unknown_handler::<Self>(handler),
            }
        }
    }

    struct OrphanController;

    impl Controller for OrphanController {
        fn construct(_request: &Request<Body>) -> Self {
            OrphanController
        }
    }

    impl RouteHandlers for OrphanController {
        fn declare_routes(registry: &mut RouteRegistry) {
            registry.declare_route::<Self>("/orphan", HttpMethod::Get, vec![], "lost");
        }

        fn invoke(self, handler: &str, _request: Request<Body>) -> HandlerFuture {
            unknown_handler::<Self>(handler)
        }
    }

    impl ClassRoute for OrphanController {
        fn declare_class(_registry: &mut RouteRegistry) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_full_path_and_chain_order() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let trail: Trail = Arc::new(Mutex::new(Vec::new()));
        let mut registry = RouteRegistry::new();
        registry
            .declare_class::<UserController>("/users", vec![label(&trail, "auth")])
            .unwrap();
        registry.declare_route::<UserController>(
            "/:id",
            HttpMethod::Get,
            vec![label(&trail, "log")],
            "get_user",
        );

        let mut router = RecordingRouter::default();
        let count = init_router(&mut router, &registry, &RouterOptions::new().with_prefix("/api"))
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            router.registered(),
            vec![("GET".to_string(), "/api/users/:id".to_string())]
        );

        let chain = &router.routes[0].2;
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.handler_name(), "get_user");
        assert_eq!(chain.owner().name(), "UserController");

        let response = chain.call(Request::new(Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*trail.lock().unwrap(), vec!["auth", "log"]);
    }

    #[test]
    fn test_path_is_plain_concatenation() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("users", vec![]).unwrap();
        registry.declare_route::<UserController>("", HttpMethod::Get, vec![], "list");
        registry.declare_route::<UserController>("list/", HttpMethod::Get, vec![], "list");

        let mut router = RecordingRouter::default();
        init_router(&mut router, &registry, &RouterOptions::new().with_prefix("/api/")).unwrap();

        let paths: Vec<String> = router.registered().into_iter().map(|(_, p)| p).collect();
        assert_eq!(paths, vec!["/api/users", "/api/userslist/"]);
    }

    #[test]
    fn test_same_segment_different_verbs() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        registry.declare_route::<UserController>("/", HttpMethod::Get, vec![], "list");
        registry.declare_route::<UserController>("/", HttpMethod::Post, vec![], "create");

        let mut router = RecordingRouter::default();
        init_router(&mut router, &registry, &RouterOptions::default()).unwrap();

        assert_eq!(
            router.registered(),
            vec![
                ("GET".to_string(), "/users/".to_string()),
                ("POST".to_string(), "/users/".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        registry.declare_route::<UserController>("/", HttpMethod::Get, vec![], "list");
        registry.declare_route::<UserController>("/", HttpMethod::Get, vec![], "list_v2");

        let mut router = RecordingRouter::default();
        assert_eq!(init_router(&mut router, &registry, &RouterOptions::default()).unwrap(), 2);
        assert_eq!(router.routes[1].2.handler_name(), "list_v2");
    }

    #[test]
    fn test_uninitialized_registry() {
        let mut router = RecordingRouter::default();
        let mut registry = RouteRegistry::new();
        let err = init_router(&mut router, &registry, &RouterOptions::default()).unwrap_err();
        assert!(matches!(err, RouteError::UninitializedRegistry { missing: "class route" }));

        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        let err = init_router(&mut router, &registry, &RouterOptions::default()).unwrap_err();
        assert!(matches!(err, RouteError::UninitializedRegistry { missing: "method route" }));
        assert_eq!(registry.phase(), RegistryPhase::Collecting);
    }

    #[test]
    fn test_unresolved_owner() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        registry.mount::<OrphanController>().unwrap();

        let mut router = RecordingRouter::default();
        let err = init_router(&mut router, &registry, &RouterOptions::default()).unwrap_err();
        match err {
            RouteError::UnresolvedOwner { owner, handler, segment } => {
                assert_eq!(owner, "OrphanController");
                assert_eq!(handler, "lost");
                assert_eq!(segment, "/orphan");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(router.routes.is_empty());
    }

    #[test]
    fn test_host_error_propagates() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        registry.declare_route::<UserController>("/", HttpMethod::Resources, vec![], "list");

        let err = init_router(&mut RefusingRouter, &registry, &RouterOptions::default()).unwrap_err();
        assert!(matches!(err, RouteError::UnsupportedMethod { method: HttpMethod::Resources, .. }));
    }

    #[test]
    fn test_second_run_registers_again() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        registry.declare_route::<UserController>("/", HttpMethod::Get, vec![], "list");

        let mut router = RecordingRouter::default();
        init_router(&mut router, &registry, &RouterOptions::default()).unwrap();
        assert_eq!(registry.phase(), RegistryPhase::Initialized);

        init_router(&mut router, &registry, &RouterOptions::default()).unwrap();
        assert_eq!(router.routes.len(), 2);
    }

    #[test]
    fn test_declaring_after_init_leaves_host_untouched() {
        let mut registry = RouteRegistry::new();
        registry.declare_class::<UserController>("/users", vec![]).unwrap();
        registry.declare_route::<UserController>("/", HttpMethod::Get, vec![], "list");

        let mut router = RecordingRouter::default();
        init_router(&mut router, &registry, &RouterOptions::default()).unwrap();

        registry.declare_route::<UserController>("/late", HttpMethod::Post, vec![], "late");
        assert_eq!(router.registered(), vec![("GET".to_string(), "/users/".to_string())]);
        assert_eq!(registry.phase(), RegistryPhase::Initialized);
        assert_eq!(registry.routes("/late").unwrap().len(), 1);
    }

    #[test]
    fn test_register_line_format() {
        assert_eq!(
            register_line(HttpMethod::Delite, "/api/users/1", "UserController", "remove"),
            "register URL * DELITE /api/users/1 * UserController.remove"
        );
    }
}
