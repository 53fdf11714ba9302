//! Configuration loading and validation tests

#[cfg(test)]
mod tests {
    use crate::common::fixtures::ConfigFactory;
    use crate::{assert_err, assert_ok};
    use nosh_guard::GatewayError;
    use nosh_guard::config::{Config, Environment, PipelineProfile};
    use nosh_guard::server::AppState;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PIPELINES_YAML: &str = r#"
environment: production
server:
  cors:
    allowed_origins: ["https://cribnosh.com"]
security:
  admin_key: "nosh-admin-0123456789"
pipelines:
  general:
    rate_limit: { window_ms: 60000, max_requests: 300, key_prefix: general }
    timeout_ms: 20000
    cache: { enabled: true, ttl_secs: 120 }
  sensitive:
    rate_limit: { window_ms: 60000, max_requests: 40, key_prefix: sensitive }
    timeout_ms: 30000
  auth:
    rate_limit: { window_ms: 300000, max_requests: 100, key_prefix: auth }
    timeout_ms: 10000
  moderation:
    rate_limit: { window_ms: 60000, max_requests: 80, key_prefix: moderation }
    retry: { enabled: true, max_attempts: 2 }
    timeout_ms: 15000
"#;

    const PRODUCTION_YAML: &str = "environment: production\nserver:\n  cors:\n    allowed_origins: [\"https://cribnosh.com\"]\n";

    #[test]
    fn test_empty_document_uses_environment_defaults() {
        let config = assert_ok!(ConfigFactory::from_yaml(PRODUCTION_YAML));
        let pipelines = config.gateway.pipelines();

        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(pipelines.general.rate_limit.max_requests, 250);
        assert_eq!(pipelines.auth.rate_limit.window_ms, 300_000);
        assert!(!pipelines.sensitive.retry.enabled);
    }

    #[test]
    fn test_explicit_pipelines_override_defaults() {
        let config = assert_ok!(ConfigFactory::from_yaml(PIPELINES_YAML));
        let pipelines = config.gateway.pipelines();

        assert_eq!(pipelines.general.rate_limit.max_requests, 300);
        assert!(pipelines.general.cache.enabled);
        assert!(pipelines.general.security_enabled);
        assert_eq!(pipelines.moderation.retry.max_attempts, 2);

        let state = AppState::new(config);
        assert_eq!(state.limiters.get("sensitive").unwrap().limit(), 40);
        assert_eq!(
            state.pipelines.get(PipelineProfile::General).config().timeout_ms,
            20_000
        );
    }

    #[test]
    fn test_duplicate_limiter_prefixes_are_rejected() {
        let yaml = PIPELINES_YAML.replace("key_prefix: auth", "key_prefix: general");
        let error = assert_err!(ConfigFactory::from_yaml(&yaml));
        assert!(matches!(error, GatewayError::Config(_)));
        assert!(error.to_string().contains("prefix"));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let yaml = PIPELINES_YAML.replace("window_ms: 300000", "window_ms: 0");
        assert_err!(ConfigFactory::from_yaml(&yaml));
    }

    #[test]
    fn test_short_admin_key_is_rejected() {
        let error = assert_err!(ConfigFactory::from_yaml("security:\n  admin_key: short\n"));
        assert!(error.to_string().contains("Admin key"));
    }

    #[test]
    fn test_invalid_blocked_ip_is_rejected() {
        assert_err!(ConfigFactory::from_yaml(
            "security:\n  blocked_ips: [\"not-an-ip\"]\n"
        ));
    }

    #[test]
    fn test_production_without_allow_list_is_rejected() {
        let error = assert_err!(ConfigFactory::from_yaml("environment: production\n"));
        assert!(error.to_string().contains("allow-list"));
    }

    #[test]
    fn test_credentialed_wildcard_is_rejected() {
        let error = assert_err!(ConfigFactory::from_yaml(
            "server:\n  cors:\n    allow_credentials: true\n"
        ));
        assert!(error.to_string().contains("credentials"));
    }

    #[test]
    fn test_cors_origin_needs_scheme() {
        let error = assert_err!(ConfigFactory::from_yaml(
            "server:\n  cors:\n    allowed_origins: [\"cribnosh.com\"]\n"
        ));
        assert!(error.to_string().contains("http"));
    }

    #[tokio::test]
    async fn test_yaml_round_trip_through_file() {
        let original = ConfigFactory::config(Environment::Test);
        let yaml = assert_ok!(original.to_yaml());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let loaded = assert_ok!(Config::from_file(file.path()).await);

        assert_eq!(loaded.environment(), Environment::Test);
        assert_eq!(loaded.gateway.pipelines(), original.gateway.pipelines());
    }
}
