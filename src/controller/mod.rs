//! Controller traits
//!
//! A controller is declared in two halves, usually generated by macros:
//! - `#[controller(path = "...", middleware = [...])]` on the struct implements [`ClassRoute`]
//! - `#[routes]` on the impl block implements [`RouteHandlers`]
//!
//! [`Controller`] itself is written by hand: it builds a fresh instance from the
//! incoming request, once per request.

use crate::error::{Result, RouteError};
use crate::middleware::{HandlerFuture, MiddlewareResult};
use crate::registry::RouteRegistry;
use axum::{body::Body, http::Request};
use std::any::TypeId;
use std::sync::Arc;

/// Per-request construction of a controller
pub trait Controller: Sized + Send + Sync + 'static {
    /// Build the instance that will serve `request`
    fn construct(request: &Request<Body>) -> Self;
}

/// Class-level route declaration (path prefix and middleware)
pub trait ClassRoute {
    fn declare_class(registry: &mut RouteRegistry) -> Result<()>;
}

/// Method-level route declarations and dispatch by handler name
pub trait RouteHandlers: Controller {
    /// Append one entry per handler method to the registry
    fn declare_routes(registry: &mut RouteRegistry);

    /// Call the handler named `handler` on this instance
    fn invoke(self, handler: &str, request: Request<Body>) -> HandlerFuture;
}

type DispatchFn = fn(Arc<str>, Request<Body>) -> HandlerFuture;

/// Type-erased reference to a controller type
#[derive(Clone, Copy)]
pub struct OwnerType {
    id: TypeId,
    name: &'static str,
    dispatch_fn: DispatchFn,
}

impl OwnerType {
    pub fn of<C: RouteHandlers>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: class_name::<C>(),
            dispatch_fn: dispatch_to::<C>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The class name routes are keyed by
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Construct a new controller from `request` and invoke `handler` on it
    pub fn dispatch(self, handler: Arc<str>, request: Request<Body>) -> HandlerFuture {
        (self.dispatch_fn)(handler, request)
    }
}

impl PartialEq for OwnerType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OwnerType {}

impl std::fmt::Debug for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OwnerType").field(&self.name).finish()
    }
}

fn dispatch_to<C: RouteHandlers>(handler: Arc<str>, request: Request<Body>) -> HandlerFuture {
    let controller = C::construct(&request);
    controller.invoke(&handler, request)
}

/// Short type name of `T`, without module path or generic arguments
pub fn class_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Future for a handler name the controller does not declare
pub fn unknown_handler<C>(handler: &str) -> HandlerFuture {
    let error = RouteError::UnknownHandler {
        owner: class_name::<C>().to_string(),
        handler: handler.to_string(),
    };
    let result: MiddlewareResult = Err(error.into());
    Box::pin(std::future::ready(result))
}
