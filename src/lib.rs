//! # route-mapping
//!
//! Declarative controller routing for axum.
//!
//! Controllers declare a class-level path prefix and middleware, and each
//! handler method declares its own path segment, HTTP verb and middleware. The
//! declarations are collected into a [`RouteRegistry`]; [`init_router`] then
//! composes `prefix + class path + method segment` for every route and registers
//! the middleware chain with a host router such as [`AxumHost`].
//!
//! ## Features
//!
//! - **Class and method declarations**: `#[controller]` and `#[routes]` generate the registry calls
//! - **Ordered middleware chains**: class middleware, then method middleware, then the handler
//! - **Fresh controller per request**: [`Controller::construct`] runs for every dispatched request
//! - **Explicit registry**: no process-wide state, several route tables can coexist
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use route_mapping::prelude::*;
//!
//! #[controller(path = "/users", middleware = [RequestLogger])]
//! pub struct UserController {
//!     caller: Option<String>,
//! }
//!
//! impl Controller for UserController {
//!     fn construct(request: &Request<Body>) -> Self {
//!         let caller = request
//!             .headers()
//!             .get("x-user")
//!             .and_then(|v| v.to_str().ok())
//!             .map(str::to_string);
//!         Self { caller }
//!     }
//! }
//!
//! #[routes]
//! impl UserController {
//!     #[route("/{id}", GET)]
//!     async fn get_user(&self, request: Request<Body>) -> String {
//!         format!("{} asked for {}", self.caller.as_deref().unwrap_or("anonymous"), request.uri())
//!     }
//!
//!     #[route("/", POST)]
//!     async fn create_user(&self) -> StatusCode {
//!         StatusCode::CREATED
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> route_mapping::Result<()> {
//!     let mut registry = RouteRegistry::new();
//!     registry.mount::<UserController>()?;
//!
//!     let mut host = AxumHost::new();
//!     init_router(&mut host, &registry, &RouterOptions::new().with_prefix("/api"))?;
//!     let app: Router = host.into_router();
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```

// Lets the declaration macros refer to `::route_mapping` from inside this crate.
extern crate self as route_mapping;

pub mod config;
pub mod controller;
pub mod error;
pub mod method;
pub mod middleware;
pub mod registry;
pub mod router;

// Re-export core types
pub use config::RouterOptions;
pub use controller::{ClassRoute, Controller, OwnerType, RouteHandlers};
pub use error::{Result, RouteError};
pub use method::HttpMethod;
pub use middleware::{Middleware, RouteChain, SharedMiddleware};
pub use registry::{RegistryPhase, RouteRegistry};
pub use router::{init_router, AxumHost, HostRouter};

// Re-export macros
pub use route_mapping_macro::{controller, route, routes};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use route_mapping::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RouterOptions;
    pub use crate::controller::{ClassRoute, Controller, RouteHandlers};
    pub use crate::error::{Result, RouteError};
    pub use crate::method::HttpMethod;
    pub use crate::middleware::{
        from_fn, Middleware, MiddlewareResult, Next, RequestLogger, RouteChain, SharedMiddleware,
    };
    pub use crate::registry::{RegistryPhase, RouteRegistry};
    pub use crate::router::{init_router, AxumHost, HostRouter};
    pub use crate::{controller, route, routes};
    pub use async_trait::async_trait;
    pub use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::{IntoResponse, Response},
        Router,
    };
}
