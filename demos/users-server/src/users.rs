use crate::auth::ApiKey;
use axum::extract::Path;
use axum::{Json, RequestExt};
use route_mapping::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

static USERS: LazyLock<Mutex<BTreeMap<u64, User>>> = LazyLock::new(|| Mutex::new(BTreeMap::new()));

#[controller(path = "/users", middleware = [RequestLogger, ApiKey::new("demo-key")])]
pub struct UserController {
    caller: String,
}

impl Controller for UserController {
    fn construct(request: &Request<Body>) -> Self {
        let caller = request
            .headers()
            .get("x-user")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("anonymous")
            .to_string();
        Self { caller }
    }
}

#[routes]
impl UserController {
    #[route("/", GET)]
    async fn list(&self) -> Json<Vec<User>> {
        let users = USERS.lock().map(|u| u.values().cloned().collect()).unwrap_or_default();
        Json(users)
    }

    #[route("/", POST)]
    async fn create(&self, request: Request<Body>) -> Response {
        let bytes = match axum::body::to_bytes(request.into_body(), 64 * 1024).await {
            Ok(bytes) => bytes,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };
        let body: CreateUserRequest = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
        };

        let Ok(mut users) = USERS.lock() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };
        let id = users.keys().next_back().map_or(1, |last| last + 1);
        let user = User { id, name: body.name };
        users.insert(id, user.clone());
        tracing::info!("{} created user {}", self.caller, id);
        (StatusCode::CREATED, Json(user)).into_response()
    }

    #[route("/{id}", GET)]
    async fn get_one(&self, mut request: Request<Body>) -> Response {
        let id = match user_id(&mut request).await {
            Ok(id) => id,
            Err(rejection) => return rejection,
        };
        let user = USERS.lock().ok().and_then(|users| users.get(&id).cloned());
        match user {
            Some(user) => Json(user).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    #[route("/{id}", DEL)]
    async fn remove(&self, mut request: Request<Body>) -> Response {
        let id = match user_id(&mut request).await {
            Ok(id) => id,
            Err(rejection) => return rejection,
        };
        let removed = USERS.lock().ok().and_then(|mut users| users.remove(&id));
        match removed {
            Some(_) => {
                tracing::info!("{} removed user {}", self.caller, id);
                StatusCode::NO_CONTENT.into_response()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// The `{id}` capture of the matched route
async fn user_id(request: &mut Request<Body>) -> std::result::Result<u64, Response> {
    request
        .extract_parts::<Path<u64>>()
        .await
        .map(|Path(id)| id)
        .map_err(IntoResponse::into_response)
}
