use crate::method::HttpMethod;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Class route path must be a non-empty string: {class_name}")]
    InvalidPath { class_name: String },

    #[error("Class route already declared for {class_name}: path [{path}]")]
    DuplicatePath { class_name: String, path: String },

    #[error("No class route declared for {owner} (needed by {owner}.{handler} on segment [{segment}])")]
    UnresolvedOwner {
        owner: String,
        handler: String,
        segment: String,
    },

    #[error("Route registry is uninitialized: no {missing} declarations were made")]
    UninitializedRegistry { missing: &'static str },

    #[error("Host router does not support {method} (path {path})")]
    UnsupportedMethod { method: HttpMethod, path: String },

    #[error("Host router rejected {path}: {reason}")]
    HostRejected { path: String, reason: String },

    #[error("Unknown handler: {owner}.{handler}")]
    UnknownHandler { owner: String, handler: String },
}

impl axum::response::IntoResponse for RouteError {
    fn into_response(self) -> axum::response::Response {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            self.to_string(),
        )
            .into_response()
    }
}
