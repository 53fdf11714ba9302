//! Outbound response produced by handlers and pipelines

use crate::utils::error::Result;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use bytes::Bytes;
use serde::Serialize;

/// Response body variants
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    /// Serialized JSON document
    Json(Bytes),
    /// Any other payload with its content type
    Raw { content_type: String, bytes: Bytes },
}

impl ResponseBody {
    pub fn len(&self) -> usize {
        match self {
            ResponseBody::Empty => 0,
            ResponseBody::Json(bytes) => bytes.len(),
            ResponseBody::Raw { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResponseBody::Empty => &[],
            ResponseBody::Json(bytes) => bytes,
            ResponseBody::Raw { bytes, .. } => bytes,
        }
    }
}

/// Handler output
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl GatewayResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// Serialize `value` as a JSON body
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Json(Bytes::from(bytes)),
        })
    }

    /// 200 with a JSON body
    pub fn ok_json<T: Serialize>(value: &T) -> Result<Self> {
        Self::json(StatusCode::OK, value)
    }

    pub fn raw<C: Into<String>, B: Into<Bytes>>(status: StatusCode, content_type: C, bytes: B) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Raw {
                content_type: content_type.into(),
                bytes: bytes.into(),
            },
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.body, ResponseBody::Json(_))
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Convert into an actix response
    pub fn into_http_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        for (name, value) in self.headers.iter() {
            builder.append_header((name.clone(), value.clone()));
        }
        match self.body {
            ResponseBody::Empty => builder.finish(),
            ResponseBody::Json(bytes) => builder
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .body(bytes),
            ResponseBody::Raw {
                content_type,
                bytes,
            } => builder
                .insert_header((header::CONTENT_TYPE, content_type))
                .body(bytes),
        }
    }
}
