//! Security screen configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Request screening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Client addresses that are always rejected
    #[serde(default)]
    pub blocked_ips: Vec<String>,
    /// Case-insensitive user agent fragments that identify scanners
    #[serde(default = "default_blocked_user_agents")]
    pub blocked_user_agents: Vec<String>,
    /// Anti-forgery settings
    #[serde(default)]
    pub csrf: CsrfConfig,
    /// Key that unlocks the admin routes in production
    #[serde(default)]
    pub admin_key: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            blocked_ips: vec![],
            blocked_user_agents: default_blocked_user_agents(),
            csrf: CsrfConfig::default(),
            admin_key: None,
        }
    }
}

/// Double-submit anti-forgery token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Header carrying the submitted token
    #[serde(default = "default_csrf_header")]
    pub header_name: String,
    /// Cookie carrying the issued token
    #[serde(default = "default_csrf_cookie")]
    pub cookie_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header_name: default_csrf_header(),
            cookie_name: default_csrf_cookie(),
        }
    }
}

fn default_csrf_header() -> String {
    "x-csrf-token".to_string()
}

fn default_csrf_cookie() -> String {
    "csrf_token".to_string()
}

fn default_blocked_user_agents() -> Vec<String> {
    [
        "sqlmap", "nikto", "nmap", "masscan", "zgrab", "acunetix", "nessus", "dirbuster",
        "wpscan", "gobuster",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
