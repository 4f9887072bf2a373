//! [`CarService`]-related read definitions.

use serde::Serialize;

use crate::domain::{car_service, CarService};

/// Public summary of a [`CarService`], omitting its
/// [`details`](CarService::details).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// ID of the [`CarService`].
    #[serde(rename = "_id")]
    pub id: car_service::Id,

    /// Title of the [`CarService`].
    pub title: String,

    /// Price of the [`CarService`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<serde_json::Value>,

    /// Public identifier of the [`CarService`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// URL of the [`CarService`] image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl From<CarService> for Summary {
    fn from(service: CarService) -> Self {
        let CarService {
            id,
            title,
            service_id,
            img,
            price,
            details: _,
        } = service;
        Self {
            id,
            title,
            price,
            service_id,
            img,
        }
    }
}
