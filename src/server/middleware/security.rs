//! Request screening: blocked clients, body size, origin and anti-forgery checks

use crate::config::{CorsConfig, SecurityConfig};
use crate::core::types::GatewayRequest;
use crate::utils::error::{GatewayError, Result};
use actix_web::http::header;
use std::collections::HashSet;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Screens requests before they reach rate limiting.
///
/// Each check fails open when it cannot evaluate the request (unparseable
/// header, bad configuration entry), except the anti-forgery check, which
/// rejects anything it cannot verify.
#[derive(Debug, Clone)]
pub struct SecurityScreen {
    config: SecurityConfig,
    cors: CorsConfig,
    blocked_ips: HashSet<IpAddr>,
    blocked_agents: Vec<String>,
}

impl SecurityScreen {
    pub fn new(config: SecurityConfig, cors: CorsConfig) -> Self {
        let blocked_ips = config
            .blocked_ips
            .iter()
            .filter_map(|ip| match ip.parse() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    warn!("Ignoring unparseable blocked IP: {}", ip);
                    None
                }
            })
            .collect();
        let blocked_agents = config
            .blocked_user_agents
            .iter()
            .map(|ua| ua.to_ascii_lowercase())
            .filter(|ua| !ua.is_empty())
            .collect();

        Self {
            config,
            cors,
            blocked_ips,
            blocked_agents,
        }
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Run every check in order, returning the first rejection
    pub fn check(&self, request: &GatewayRequest) -> Result<()> {
        self.check_client(request)?;
        self.check_body_size(request)?;
        self.check_origin(request)?;
        self.check_csrf(request)?;
        Ok(())
    }

    fn check_client(&self, request: &GatewayRequest) -> Result<()> {
        if let Some(ip) = request.client_ip {
            if self.blocked_ips.contains(&ip) {
                warn!("Rejected request from blocked address {}", ip);
                return Err(GatewayError::forbidden("Access denied"));
            }
        }

        if let Some(agent) = request.header("user-agent") {
            let agent = agent.to_ascii_lowercase();
            if let Some(pattern) = self.blocked_agents.iter().find(|p| agent.contains(p.as_str())) {
                warn!("Rejected scanner user agent matching '{}'", pattern);
                return Err(GatewayError::forbidden("Suspicious request"));
            }
        }
        Ok(())
    }

    fn check_body_size(&self, request: &GatewayRequest) -> Result<()> {
        let max = self.config.max_body_size;

        if let Some(raw) = request.headers.get(header::CONTENT_LENGTH) {
            match raw.to_str().ok().and_then(|v| v.trim().parse::<usize>().ok()) {
                Some(declared) if declared > max => {
                    return Err(GatewayError::PayloadTooLarge(format!(
                        "Request body of {} bytes exceeds the {} byte limit",
                        declared, max
                    )));
                }
                Some(_) => {}
                None => debug!("Unparseable Content-Length header, skipping size check"),
            }
        }

        if request.body.len() > max {
            return Err(GatewayError::PayloadTooLarge(format!(
                "Request body of {} bytes exceeds the {} byte limit",
                request.body.len(),
                max
            )));
        }
        Ok(())
    }

    fn check_origin(&self, request: &GatewayRequest) -> Result<()> {
        let Some(raw) = request.headers.get(header::ORIGIN) else {
            return Ok(());
        };
        let Ok(origin) = raw.to_str() else {
            debug!("Non-text Origin header, skipping origin check");
            return Ok(());
        };
        if self.cors.is_origin_allowed(origin) {
            Ok(())
        } else {
            warn!("Rejected request from origin {}", origin);
            Err(GatewayError::forbidden("Origin not allowed"))
        }
    }

    fn check_csrf(&self, request: &GatewayRequest) -> Result<()> {
        let csrf = &self.config.csrf;
        if !csrf.enabled || !request.is_state_changing() {
            return Ok(());
        }

        let submitted = request.header(&csrf.header_name).filter(|t| !t.is_empty());
        let issued = request.cookie(&csrf.cookie_name).filter(|t| !t.is_empty());
        match (submitted, issued) {
            (Some(submitted), Some(issued)) if tokens_match(submitted, issued) => Ok(()),
            (None, _) | (_, None) => {
                debug!("Missing CSRF token on {} {}", request.method, request.path);
                Err(GatewayError::forbidden("Missing CSRF token"))
            }
            _ => {
                warn!("CSRF token mismatch on {} {}", request.method, request.path);
                Err(GatewayError::forbidden("Invalid CSRF token"))
            }
        }
    }
}

/// Compare without short-circuiting on the first differing byte
pub(crate) fn tokens_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
