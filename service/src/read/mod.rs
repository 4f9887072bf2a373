//! Read entities definitions.

pub mod car_service;
