//! Given an AppState, build an initialized Actix **test service**.

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web::Error as ActixError;
use actix_web::{
    web::{self, ServiceConfig},
    App,
};

use crate::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use crate::state::app_state::AppState;

type RoutesFn = Box<dyn FnOnce(&mut ServiceConfig) + Send>;

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    // Same default as `CORS_ALLOWED_ORIGINS`: the front end itself
    let cors_origins = vec![state.settings.frontend_url.clone()];
    TestAppBuilder {
        state,
        router: None,
        cors_origins,
    }
}

pub struct TestAppBuilder {
    state: AppState,
    router: Option<RoutesFn>,
    cors_origins: Vec<String>,
}

impl TestAppBuilder {
    /// Replace the production routes for a test.
    pub fn with_routes<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceConfig) + Send + 'static,
    {
        self.router = Some(Box::new(f));
        self
    }

    pub fn with_cors_origins<I, O>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        self.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Build the service with the production routes (unless overridden)
    /// behind the same middleware stack `main` registers.
    pub async fn build(
        self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>
    {
        let app = App::new()
            // CORS wraps its body type; boxed so the stack has one response type
            .wrap(Compat::new(cors_middleware(&self.cors_origins)))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(self.state));

        let app = match self.router {
            Some(f) => app.configure(f),
            None => app.configure(crate::routes::configure),
        };

        actix_web::test::init_service(app).await
    }
}
