//! Outbound fetch tests against a mock upstream

#[cfg(test)]
mod tests {
    use nosh_guard::GatewayError;
    use nosh_guard::utils::error::recovery::{
        CircuitBreaker, CircuitBreakerConfig, CircuitState, FetchOptions, RetryConfig,
        fetch_with_breaker, fetch_with_retry,
    };
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_options(max_attempts: u32) -> FetchOptions {
        FetchOptions {
            retry: RetryConfig {
                max_attempts,
                base_delay: Duration::from_millis(10),
                max_delay: Duration::from_millis(40),
                backoff_multiplier: 2.0,
                jitter: false,
            },
            attempt_timeout: Duration::from_millis(200),
        }
    }

    fn get(server: &MockServer, route: &str) -> reqwest::Request {
        reqwest::Client::new()
            .get(format!("{}{}", server.uri(), route))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/geocode"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/geocode"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"lat":6.5}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let outcome = fetch_with_retry(&client, get(&server, "/v1/geocode"), &fast_options(3)).await;

        assert_eq!(outcome.attempts, 3);
        let response = outcome.into_result().unwrap();
        assert_eq!(response.text().await.unwrap(), r#"{"lat":6.5}"#);
    }

    #[tokio::test]
    async fn test_not_found_is_attempted_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/chefs/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let outcome =
            fetch_with_retry(&client, get(&server, "/v1/chefs/missing"), &fast_options(5)).await;

        assert_eq!(outcome.attempts, 1);
        let error = outcome.into_result().unwrap_err();
        assert!(matches!(error, GatewayError::Client { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_each_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let outcome = fetch_with_retry(&client, get(&server, "/v1/slow"), &fast_options(2)).await;

        assert_eq!(outcome.attempts, 2);
        assert!(matches!(outcome.result, Err(GatewayError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_breaker_opens_on_repeated_upstream_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let breaker =
            CircuitBreaker::new(CircuitBreakerConfig::new("email", 2, Duration::from_secs(30)));
        let request = client
            .post(format!("{}/v1/send", server.uri()))
            .body("{}")
            .build()
            .unwrap();

        let outcome = fetch_with_breaker(&client, &breaker, request, &fast_options(5)).await;

        // Two 502s open the breaker; the third attempt is rejected locally
        assert_eq!(outcome.attempts, 3);
        assert!(matches!(outcome.result, Err(GatewayError::CircuitOpen(_))));
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
