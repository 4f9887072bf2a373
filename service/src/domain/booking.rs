//! [`Booking`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{user, Details};

/// Booking of a car service made by a user.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Booking {
    /// ID of this [`Booking`].
    #[serde(rename = "_id")]
    pub id: Id,

    /// [`user::Email`] of the user owning this [`Booking`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<user::Email>,

    /// [`Status`] of this [`Booking`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Other fields of this [`Booking`] (customer name, date, price, etc).
    #[serde(flatten)]
    pub details: Details,
}

impl Booking {
    /// Keys of [`Booking::details`] clashing with the typed fields.
    const RESERVED_KEYS: [&'static str; 3] = ["_id", "email", "status"];

    /// Creates a new [`Booking`] with a fresh [`Id`].
    ///
    /// Keys of `details` clashing with the typed fields are discarded.
    #[must_use]
    pub fn new(
        email: Option<user::Email>,
        status: Option<Status>,
        mut details: Details,
    ) -> Self {
        for key in Self::RESERVED_KEYS {
            drop(details.remove(key));
        }
        Self {
            id: Id::new(),
            email,
            status,
            details,
        }
    }
}

/// ID of a [`Booking`].
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

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Status of a [`Booking`] (`pending`, `confirm`, etc).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    /// Creates a new [`Status`] if the given `status` is valid.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Option<Self> {
        let status = status.into();
        Self::check(&status).then_some(Self(status))
    }

    /// Checks whether the given `status` is a valid [`Status`].
    fn check(status: impl AsRef<str>) -> bool {
        let status = status.as_ref();
        status.trim() == status && !status.is_empty() && status.len() <= 64
    }
}

impl FromStr for Status {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Status`")
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::new(String::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom("invalid `Status`"))
    }
}
