//! [`CarService`] definitions.

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Details;

/// Car service offered for booking.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CarService {
    /// ID of this [`CarService`].
    #[serde(rename = "_id")]
    pub id: Id,

    /// Title of this [`CarService`].
    pub title: String,

    /// Public identifier of this [`CarService`] used by the front end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// URL of this [`CarService`] image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,

    /// Price of this [`CarService`], as provided by the catalogue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<serde_json::Value>,

    /// Other fields of this [`CarService`] (description, facilities, etc).
    #[serde(flatten)]
    pub details: Details,
}

/// ID of a [`CarService`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

