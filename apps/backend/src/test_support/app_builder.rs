//! Build an initialized actix **test service** around an [`AppState`],
//! wrapped in the same middleware stack as the server binary.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::web;
use actix_web::{App, Error as ActixError};

use crate::config::DEFAULT_MAX_JSON_PAYLOAD_SIZE;
use crate::judge::Judge;
use crate::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use crate::state::AppState;

pub fn create_test_app(judge: Arc<dyn Judge>) -> TestAppBuilder {
    TestAppBuilder {
        state: AppState::new(judge, DEFAULT_MAX_JSON_PAYLOAD_SIZE),
        cors_origins: Vec::new(),
    }
}

pub struct TestAppBuilder {
    state: AppState,
    cors_origins: Vec<String>,
}

impl TestAppBuilder {
    pub fn with_max_json_payload_size(mut self, limit: usize) -> Self {
        self.state.max_json_payload_size = limit;
        self
    }

    pub fn with_cors_origins(mut self, origins: &[&str]) -> Self {
        self.cors_origins = origins.iter().map(|s| s.to_string()).collect();
        self
    }

    pub async fn build(
        self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = ActixError,
    > {
        let app = App::new()
            .wrap(cors_middleware(&self.cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(self.state))
            .configure(crate::routes::configure);

        actix_web::test::init_service(app).await
    }
}
