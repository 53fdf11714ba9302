//! Framework-neutral request and response types
//!
//! Pipelines and handlers exchange these instead of actix types so they can be
//! driven directly from tests and from other transports.

mod outcome;
mod request;
mod response;

pub use outcome::RequestOutcome;
pub use request::{GatewayRequest, TrustedProxies};
pub use response::{GatewayResponse, ResponseBody};
