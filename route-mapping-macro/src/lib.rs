use proc_macro::TokenStream;

mod controller;
mod routes;

/// Attribute macro declaring the class-level route of a controller
///
/// Implements `ClassRoute`: the path prefix and middleware are recorded when
/// the controller is mounted on a `RouteRegistry`. Each middleware entry is an
/// expression evaluating to a value that implements `Middleware`.
///
/// # Example
/// ```ignore
/// use route_mapping::prelude::*;
///
/// #[controller(path = "/users", middleware = [RequestLogger, AuthMiddleware::new("admin")])]
/// pub struct UserController {
///     caller: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro collecting the `#[route]` handlers of an impl block
///
/// Implements `RouteHandlers`: one registry entry per annotated method, and
/// dispatch by method name. Handlers take `&self` and optionally the request,
/// and return anything implementing `IntoResponse`.
///
/// # Example
/// ```ignore
/// #[routes]
/// impl UserController {
///     #[route("/{id}")]
///     async fn get_user(&self, request: Request<Body>) -> String {
///         // ...
///     }
///
///     #[route("/", POST, middleware = [RateLimit::per_second(5)])]
///     async fn create_user(&self) -> StatusCode {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::routes_attribute(attr, item)
}

/// Method-level route: `#[route(segment, METHOD, middleware = [...])]`
///
/// All arguments are optional; the segment defaults to `""` and the method to
/// `GET`. Only meaningful inside a `#[routes]` impl block, which consumes it.
#[proc_macro_attribute]
pub fn route(_attr: TokenStream, item: TokenStream) -> TokenStream {
    // Pass-through, actual handling is done by #[routes] macro
    item
}
