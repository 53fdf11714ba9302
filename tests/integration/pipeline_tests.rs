//! End-to-end pipeline tests
//!
//! Handlers are wrapped by a pipeline and mounted on an actix app, then
//! driven through `actix_web::test`.

#[cfg(test)]
mod tests {
    use crate::common::assertions::{assert_error, json_body, retry_after};
    use crate::common::fixtures::{CLIENT_IP, ConfigFactory, HandlerFactory, RequestFactory};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use nosh_guard::GatewayError;
    use nosh_guard::config::{CorsConfig, Environment, PipelineConfig, PipelineProfile, SecurityConfig};
    use nosh_guard::server::AppState;
    use nosh_guard::server::middleware::{Handler, Pipeline, SecurityScreen, into_route};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn peer() -> SocketAddr {
        SocketAddr::new(CLIENT_IP.parse().unwrap(), 52100)
    }

    fn cached_general() -> Arc<Pipeline> {
        let mut config = ConfigFactory::pipeline(PipelineProfile::General);
        config.cache.enabled = true;
        config.cache.ttl_secs = 60;
        Arc::new(Pipeline::builder("general", config).build())
    }

    #[actix_web::test]
    async fn test_second_identical_get_is_served_from_cache() {
        let pipeline = cached_general();
        let (handler, calls) = HandlerFactory::counting();
        let app = test::init_service(
            App::new().route("/api/dishes", into_route(Arc::new(pipeline.wrap(handler)))),
        )
        .await;

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/dishes?cuisine=nigerian")
                .peer_addr(peer())
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        assert!(first.headers().get("x-cache").is_none());
        let first_body = test::read_body(first).await;

        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/dishes?cuisine=nigerian")
                .peer_addr(peer())
                .to_request(),
        )
        .await;
        assert_eq!(second.headers().get("x-cache").unwrap(), "HIT");
        let second_body = test::read_body(second).await;

        assert_eq!(first_body, second_body);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_fifty_first_request_is_rate_limited() {
        let config = PipelineConfig::for_profile(PipelineProfile::Sensitive, Environment::Production);
        assert_eq!(config.rate_limit.max_requests, 50);
        let pipeline = Arc::new(
            Pipeline::builder("sensitive", config)
                .environment(Environment::Production)
                .build(),
        );
        let (handler, calls) = HandlerFactory::counting();
        let app = test::init_service(
            App::new().route("/api/payments", into_route(Arc::new(pipeline.wrap(handler)))),
        )
        .await;

        for i in 0..50 {
            let resp = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri("/api/payments")
                    .peer_addr(peer())
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::OK, "request {} was rejected", i + 1);
        }

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/payments")
                .peer_addr(peer())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = resp
            .headers()
            .get("retry-after")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=60).contains(&retry_after));
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "0");
        assert_eq!(calls.load(Ordering::SeqCst), 50);
    }

    #[actix_web::test]
    async fn test_oversized_body_is_rejected_with_413() {
        let security = SecurityConfig {
            max_body_size: 1024,
            ..SecurityConfig::default()
        };
        let screen = Arc::new(SecurityScreen::new(security, CorsConfig::default()));
        let pipeline = Arc::new(
            Pipeline::builder("general", ConfigFactory::pipeline(PipelineProfile::General))
                .security(screen)
                .build(),
        );
        let (handler, calls) = HandlerFactory::counting();
        let app = test::init_service(
            App::new().route("/api/uploads", into_route(Arc::new(pipeline.wrap(handler)))),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/uploads")
                .peer_addr(peer())
                .insert_header(("x-csrf-token", "t"))
                .insert_header(("cookie", "csrf_token=t"))
                .set_payload(vec![b'x'; 4096])
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(resp.headers().get("x-error-type").unwrap(), "SECURITY_REJECTED");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_disallowed_origin_is_rejected() {
        let mut state_config = ConfigFactory::config(Environment::Production);
        state_config.gateway.server.cors.allowed_origins = vec!["https://cribnosh.com".to_string()];
        let state = AppState::new(state_config);
        let (handler, _) = HandlerFactory::counting();
        let guarded = state.guard(PipelineProfile::General, handler);

        let allowed = guarded
            .call(RequestFactory::get("/api/dishes").with_header("origin", "https://cribnosh.com"))
            .await
            .unwrap();
        assert_eq!(allowed.status, StatusCode::OK);
        assert_eq!(
            allowed.header("access-control-allow-origin"),
            Some("https://cribnosh.com")
        );

        let rejected = guarded
            .call(RequestFactory::get("/api/dishes").with_header("origin", "https://evil.example"))
            .await
            .unwrap();
        let body = assert_error(&rejected, 403, "SECURITY_REJECTED");
        assert_eq!(body["error"]["message"], "Origin not allowed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_database_outage_recovers_through_retries() {
        let state = AppState::new(ConfigFactory::config(Environment::Development));
        let (handler, calls) =
            HandlerFactory::flaky(2, || GatewayError::database("connection pool exhausted"));
        let guarded = state.guard(PipelineProfile::General, handler);

        let response = guarded
            .call(RequestFactory::post_with_csrf("/api/orders", serde_json::json!({ "dish": "suya" })))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(json_body(&response)["status"], "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_category() {
        let state = AppState::new(ConfigFactory::config(Environment::Production));
        let handler = HandlerFactory::failing(|| GatewayError::database("relation \"orders\" is locked"));
        let guarded = state.guard(PipelineProfile::Moderation, handler);

        let response = guarded.call(RequestFactory::get("/api/reports")).await.unwrap();

        let body = assert_error(&response, 503, "DATABASE_ERROR");
        assert_eq!(retry_after(&response), 60);
        assert!(!body["error"]["message"].as_str().unwrap().contains("orders"));
        assert_eq!(state.pipelines.moderation.stats().retried, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_breaker_is_not_retried() {
        let state = AppState::new(ConfigFactory::config(Environment::Development));
        let breaker = state.breakers.email.clone();
        let counter = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let attempts = counter.clone();
        let handler = move |_req: nosh_guard::core::types::GatewayRequest| {
            let breaker = breaker.clone();
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                breaker
                    .execute(async { Err::<nosh_guard::core::types::GatewayResponse, _>(GatewayError::network("smtp refused")) })
                    .await
            }
        };
        let guarded = state.guard(PipelineProfile::General, handler);

        let first = guarded.call(RequestFactory::get("/api/notify")).await.unwrap();
        // Three network failures trip the threshold-3 email breaker; the
        // fourth attempt is rejected as CIRCUIT_OPEN and ends the retries
        assert_error(&first, 503, "CIRCUIT_OPEN");
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }
}
