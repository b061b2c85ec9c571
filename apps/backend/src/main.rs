use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use grader_backend::{
    cors_middleware, routes, AppState, GraderConfig, OpenAiJudge, RequestTrace, StructuredLogger,
    TraceSpan, SERVER_VERSION,
};
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment.
    let config = match GraderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!(version = SERVER_VERSION, "server version");
    info!(
        api_key_loaded = config.openai_api_key.is_some(),
        model = %config.judge_model,
        "judge configured"
    );

    let judge = match OpenAiJudge::new(
        &config.openai_base_url,
        config.openai_api_key.clone(),
        config.judge_model.clone(),
        config.judge_timeout,
    ) {
        Ok(judge) => judge,
        Err(e) => {
            error!(error = %e, "failed to build judge client");
            std::process::exit(1);
        }
    };

    let data = web::Data::new(AppState::new(
        Arc::new(judge),
        config.max_json_payload_size,
    ));
    let cors_origins = config.cors_allowed_origins.clone();

    info!(host = %config.host, port = config.port, "server running");

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
