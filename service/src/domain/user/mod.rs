//! [`Identity`] definitions.

pub mod session;

use std::str::FromStr;

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use crate::domain::Details;

pub use self::session::Session;

/// Identity of a user, as asserted by the client on login.
///
/// Only [`Email`] is interpreted. Other fields are carried through the
/// [`Session`] as is.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Identity {
    /// [`Email`] of the user.
    pub email: Email,

    /// Any other fields the client provided.
    #[serde(flatten)]
    pub details: Details,
}

impl Identity {
    /// Creates a new [`Identity`] with the provided [`Email`] only.
    #[must_use]
    pub fn new(email: Email) -> Self {
        Self {
            email,
            details: Details::new(),
        }
    }
}

/// Email address of a user.
///
/// Any non-empty string is accepted: it's only ever compared for equality.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is not empty.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        (!address.is_empty()).then_some(Self(address))
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("empty `Email`")
    }
}

impl TryFrom<String> for Email {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("empty `Email`")
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
