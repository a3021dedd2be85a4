//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::api_scope;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! End-to-end checks of the assembled application over the in-memory
    //! store.
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test};
    use backend::domain::ports::SeedStore;
    use backend::domain::{NewNamed, NewUser, PasswordHash};
    use backend::inbound::http::health::HEALTH_MESSAGE;
    use backend::outbound::memory::InMemoryStore;
    use rstest::rstest;
    use serde_json::Value;

    async fn seeded_config() -> ServerConfig {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_categories(vec![NewNamed::new("Soup"), NewNamed::new("Beef")])
            .await
            .expect("categories");
        store
            .insert_users(vec![NewUser {
                name: "Ann".to_owned(),
                email: "ann@example.com".to_owned(),
                password_hash: PasswordHash::from_encoded("$2b$10$hash"),
                avatar: None,
            }])
            .await
            .expect("users");
        ServerConfig::new("127.0.0.1:0".parse().expect("addr")).with_memory_store(store)
    }

    #[rstest]
    #[actix_web::test]
    async fn serves_catalogue_with_trace_header() {
        let config = seeded_config().await;
        let health = web::Data::new(HealthState::new());
        let app = test::init_service(build_app(health, build_http_state(&config))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/categories").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["name"], "Beef");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_recipe_error_carries_request_trace_id() {
        let config = seeded_config().await;
        let health = web::Data::new(HealthState::new());
        let app = test::init_service(build_app(health, build_http_state(&config))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/recipes/64b1f0a2c3d4e5f601234567")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let header = res
            .headers()
            .get("trace-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("trace-id header");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Recipe not found");
        assert_eq!(body["traceId"].as_str(), Some(header.as_str()));
    }

    #[rstest]
    #[actix_web::test]
    async fn health_endpoints_are_mounted() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("addr"));
        let app = test::init_service(build_app(health, build_http_state(&config))).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/health").to_request(),
        )
        .await;
        assert_eq!(body["message"], HEALTH_MESSAGE);
    }
}
