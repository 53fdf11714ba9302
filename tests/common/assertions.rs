//! Custom assertions for pipeline responses

use nosh_guard::core::types::GatewayResponse;
use serde_json::Value;

/// Parse a JSON response body
pub fn json_body(response: &GatewayResponse) -> Value {
    serde_json::from_slice(response.body.as_bytes()).expect("response body is JSON")
}

/// Assert the response is an error envelope with `code` and `status`
pub fn assert_error(response: &GatewayResponse, status: u16, code: &str) -> Value {
    assert_eq!(response.status.as_u16(), status, "unexpected status");
    assert_eq!(response.header("x-error-type"), Some(code));

    let body = json_body(response);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], code);
    assert!(body["error"]["timestamp"].is_i64());
    body
}

/// Assert `Retry-After` is present and parse it
pub fn retry_after(response: &GatewayResponse) -> u64 {
    response
        .header("retry-after")
        .expect("Retry-After header")
        .parse()
        .expect("Retry-After is an integer")
}
