//! Request handlers and the actix adapter

use crate::core::types::{GatewayRequest, GatewayResponse};
use crate::utils::error::Result;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Route, web};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Anything that turns a request into a response
///
/// Handlers surface outbound failures as [`crate::utils::error::GatewayError`]
/// so pipelines can retry and classify them.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(GatewayRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GatewayResponse>> + Send + 'static,
{
    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        (self)(request).await
    }
}

/// Mount a handler as an actix route accepting any method
pub fn into_route<H: Handler>(handler: Arc<H>) -> Route {
    web::route().to(move |req: HttpRequest, body: web::Bytes| {
        let handler = handler.clone();
        async move {
            let request = GatewayRequest::from_http(&req, body);
            respond(handler.call(request).await)
        }
    })
}

/// Render a handler result, using the error envelope for failures
pub fn respond(result: Result<GatewayResponse>) -> HttpResponse {
    match result {
        Ok(response) => response.into_http_response(),
        Err(e) => e.error_response(),
    }
}
