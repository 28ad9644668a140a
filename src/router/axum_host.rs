use super::HostRouter;
use crate::error::{Result, RouteError};
use crate::method::HttpMethod;
use crate::middleware::{MiddlewareResult, RouteChain};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};

/// [`HostRouter`] backed by axum
///
/// Registrations are buffered and turned into an [`axum::Router`] by
/// [`AxumHost::into_router`]. Registering the same method twice on a path keeps
/// the last chain, `ALL` becomes the path's method fallback and `RESOURCES` is
/// refused.
///
/// Each new path is checked against the ones already held with the same
/// matcher axum routes with, so a path axum would refuse (conflicting
/// captures, unbalanced braces) fails at registration with
/// [`RouteError::HostRejected`] and `into_router` never panics.
///
/// # Example
/// ```rust,no_run
/// use route_mapping::{init_router, AxumHost, RouteRegistry, RouterOptions};
///
/// # fn main() -> route_mapping::Result<()> {
/// let registry = RouteRegistry::new();
/// // registry.mount::<UserController>()?;
///
/// let mut host = AxumHost::new();
/// init_router(&mut host, &registry, &RouterOptions::new().with_prefix("/api"))?;
/// let app: axum::Router = host.into_router();
/// # Ok(())
/// # }
/// ```
pub struct AxumHost {
    paths: Vec<PathBindings>,
    matcher: matchit::Router<()>,
}

impl Default for AxumHost {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            matcher: matchit::Router::new(),
        }
    }
}

impl std::fmt::Debug for AxumHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxumHost").field("paths", &self.paths).finish()
    }
}

#[derive(Debug)]
struct PathBindings {
    path: String,
    methods: Vec<(HttpMethod, RouteChain)>,
}

impl AxumHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (path, method) bindings currently held
    pub fn len(&self) -> usize {
        self.paths.iter().map(|p| p.methods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Build the axum router, one `route` per distinct path
    pub fn into_router<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut router = Router::new();
        for bindings in self.paths {
            let mut method_router: MethodRouter<S> = MethodRouter::new();
            for (method, chain) in bindings.methods {
                method_router = bind(method_router, method, chain);
            }
            router = router.route(&bindings.path, method_router);
        }
        router
    }
}

impl HostRouter for AxumHost {
    fn route(&mut self, method: HttpMethod, path: &str, chain: RouteChain) -> Result<()> {
        if method == HttpMethod::Resources {
            return Err(RouteError::UnsupportedMethod {
                method,
                path: path.to_string(),
            });
        }
        check_path(path)?;

        // DELITE and DEL land on the same axum slot
        let method = if method.is_delete() { HttpMethod::Del } else { method };

        let index = match self.paths.iter().position(|p| p.path == path) {
            Some(index) => index,
            None => {
                self.matcher
                    .insert(path, ())
                    .map_err(|e| RouteError::HostRejected {
                        path: path.to_string(),
                        reason: e.to_string(),
                    })?;
                tracing::debug!("axum {}({})", method.router_method(), path);
                self.paths.push(PathBindings {
                    path: path.to_string(),
                    methods: Vec::new(),
                });
                self.paths.len() - 1
            }
        };
        let methods = &mut self.paths[index].methods;
        match methods.iter_mut().find(|(m, _)| *m == method) {
            Some(slot) => {
                tracing::debug!("{} {} re-registered, replacing previous handler", method, path);
                slot.1 = chain;
            }
            None => methods.push((method, chain)),
        }
        Ok(())
    }
}

fn check_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(RouteError::HostRejected {
            path: path.to_string(),
            reason: "paths must start with `/`".to_string(),
        });
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(RouteError::HostRejected {
            path: path.to_string(),
            reason: "captures must use `{name}` or `{*name}` syntax".to_string(),
        });
    }
    Ok(())
}

fn method_filter(method: HttpMethod) -> Option<MethodFilter> {
    match method {
        HttpMethod::Get => Some(MethodFilter::GET),
        HttpMethod::Post => Some(MethodFilter::POST),
        HttpMethod::Head => Some(MethodFilter::HEAD),
        HttpMethod::Options => Some(MethodFilter::OPTIONS),
        HttpMethod::Put => Some(MethodFilter::PUT),
        HttpMethod::Patch => Some(MethodFilter::PATCH),
        HttpMethod::Del | HttpMethod::Delite => Some(MethodFilter::DELETE),
        HttpMethod::All | HttpMethod::Resources => None,
    }
}

fn bind<S>(router: MethodRouter<S>, method: HttpMethod, chain: RouteChain) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let handler = move |request: Request<Body>| {
        let response = chain.call(request);
        async move { respond(response.await) }
    };
    match method_filter(method) {
        Some(filter) => router.on(filter, handler),
        None => router.fallback(handler),
    }
}

fn respond(result: MiddlewareResult) -> Response {
    match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Route chain failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
