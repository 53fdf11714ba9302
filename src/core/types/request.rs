//! Inbound request snapshot

use actix_web::http::Method;
use actix_web::{HttpRequest, web};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use bytes::Bytes;
use std::net::IpAddr;

/// Everything a pipeline and its handler need to know about a request
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Socket peer, or the forwarded address when the peer is a trusted proxy
    pub client_ip: Option<IpAddr>,
}

/// Proxies allowed to report the client address through forwarding headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedProxies(Vec<IpAddr>);

impl TrustedProxies {
    pub fn new(proxies: Vec<IpAddr>) -> Self {
        Self(proxies)
    }

    /// Parse configured addresses, skipping any that are not IPs
    pub fn from_config(proxies: &[String]) -> Self {
        Self(proxies.iter().filter_map(|p| p.parse().ok()).collect())
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(ip)
    }
}

impl GatewayRequest {
    pub fn new<S: Into<String>>(method: Method, path: S) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            client_ip: None,
        }
    }

    /// Snapshot an actix request and its collected body.
    ///
    /// Forwarding headers are only honoured when the peer is listed in the
    /// app's [`TrustedProxies`]; without that data every request is keyed by
    /// its peer address.
    pub fn from_http(req: &HttpRequest, body: Bytes) -> Self {
        let peer = req.peer_addr().map(|addr| addr.ip());
        let trusted = req
            .app_data::<web::Data<TrustedProxies>>()
            .is_some_and(|proxies| peer.is_some_and(|ip| proxies.contains(&ip)));
        let client_ip = if trusted {
            req.connection_info()
                .realip_remote_addr()
                .and_then(parse_ip)
                .or(peer)
        } else {
            peer
        };

        Self {
            method: req.method().clone(),
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            headers: req.headers().clone(),
            body,
            client_ip,
        }
    }

    pub fn with_query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = query.into();
        self
    }

    /// Add a header; invalid names or values are ignored
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// First value of a header as text, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of a named cookie from the `Cookie` header
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(actix_web::http::header::COOKIE)
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Path plus query, as the client sent it
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Whether the method changes server state
    pub fn is_state_changing(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }
}

/// Parse `ip` or `ip:port` (including bracketed IPv6)
fn parse_ip(addr: &str) -> Option<IpAddr> {
    if let Ok(ip) = addr.parse() {
        return Some(ip);
    }
    addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip())
}
