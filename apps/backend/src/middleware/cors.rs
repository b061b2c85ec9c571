use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the grading API.
///
/// With no configured origins any origin is allowed, matching a game client
/// that may be served from anywhere. Otherwise only the listed `http(s)`
/// origins are; empty and `"null"` entries are ignored.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let origins: Vec<&str> = allowed_origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-error-code"),
        ])
        .max_age(3600);

    if origins.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
