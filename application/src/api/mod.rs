//! HTTP API definitions.

pub mod auth;
pub mod booking;
pub mod car_service;

/// Health check handler.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn root() -> &'static str {
    "My car management service is working"
}
