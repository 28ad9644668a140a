use route_mapping::prelude::*;

/// Rejects requests without the expected `x-api-key` header
pub struct ApiKey {
    key: String,
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Middleware for ApiKey {
    async fn handle(&self, request: Request<Body>, next: Next) -> MiddlewareResult {
        let authorized = request
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == self.key);
        if !authorized {
            tracing::warn!("Rejected {} {}: bad api key", request.method(), request.uri());
            return Ok((StatusCode::UNAUTHORIZED, "missing or invalid x-api-key").into_response());
        }
        next.run(request).await
    }
}
