//! Domain definitions.

pub mod booking;
pub mod car_service;
pub mod user;

pub use self::{booking::Booking, car_service::CarService, user::Identity};

/// Free-form fields of a document not covered by its typed fields.
pub type Details = serde_json::Map<String, serde_json::Value>;
