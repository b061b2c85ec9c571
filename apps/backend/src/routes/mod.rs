use actix_web::web;

pub mod grade;
pub mod health;

/// Register every route. Shared by `main.rs` and the test app builder.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(grade::configure_routes);
}
