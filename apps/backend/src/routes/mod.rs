use actix_web::web;

pub mod auth;
pub mod health;

/// Register every route. Used by `main.rs` and by `test_support::create_test_app`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /
    cfg.configure(health::configure_routes);

    // Login flow and token introspection: /auth/**
    cfg.service(web::scope("/auth").configure(auth::configure_routes));
}
