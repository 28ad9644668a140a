use route_mapping::prelude::*;

#[controller(path = "/health")]
pub struct HealthController;

impl Controller for HealthController {
    fn construct(_request: &Request<Body>) -> Self {
        HealthController
    }
}

#[routes]
impl HealthController {
    #[route]
    async fn check(&self) -> &'static str {
        "ok"
    }

    #[route("", HEAD)]
    async fn probe(&self) -> StatusCode {
        StatusCode::OK
    }
}
