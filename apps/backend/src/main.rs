use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use auth_gateway::config::Config;
use auth_gateway::infra::state::build_state;
use auth_gateway::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use auth_gateway::oidc::AzureAdProvider;
use auth_gateway::routes;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: env_file or --env-file
    // - Local dev: source an env file (e.g., set -a; . ./.env; set +a)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let provider = match AzureAdProvider::discover(&config.azure_ad).await {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_config(&config)
        .with_provider(Arc::new(provider))
        .build()
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    if let Some(allowlist) = &config.email_allowlist {
        info!(patterns = allowlist.pattern_count(), "email allow-list enabled");
    }
    info!(host = %config.host, port = config.port, env = %config.app_env, "starting auth gateway");

    let data = web::Data::new(app_state);
    let cors_origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(SecurityHeaders)
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
