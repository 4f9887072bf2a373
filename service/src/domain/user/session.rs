//! [`Session`] definitions.

use std::time::Duration;

use common::{unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Debug, Display, Error, From};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::Identity;

/// User session.
///
/// Serialized as claims of a [JWT], so it's never stored server-side.
///
/// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    /// [`Identity`] this [`Session`] is issued for.
    #[serde(rename = "user")]
    pub identity: Identity,

    /// [`DateTime`] when this [`Session`] was issued.
    #[serde(rename = "iat", with = "common::datetime::serde::unix_timestamp")]
    pub issued_at: IssuanceDateTime,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Creates a new [`Session`] for the provided [`Identity`], issued now and
    /// valid for the provided `ttl`.
    ///
    /// # Panics
    ///
    /// If the expiration date and time is out of the supported range, which
    /// cannot happen for a `ttl` up to [`Config::MAX_SESSION_TTL`].
    ///
    /// [`Config::MAX_SESSION_TTL`]: crate::Config::MAX_SESSION_TTL
    #[must_use]
    pub fn new(identity: Identity, ttl: Duration) -> Self {
        Self::issued_at(identity, DateTime::now(), ttl)
    }

    /// Creates a new [`Session`] for the provided [`Identity`], issued at the
    /// provided [`DateTime`] and valid for the provided `ttl`.
    ///
    /// # Panics
    ///
    /// If `issued_at + ttl` is out of the supported date and time range.
    #[must_use]
    pub fn issued_at(
        identity: Identity,
        issued_at: DateTime,
        ttl: Duration,
    ) -> Self {
        let issued_at = issued_at.truncate_subsecond();
        Self {
            identity,
            issued_at: issued_at.coerce(),
            expires_at: (issued_at + ttl).coerce(),
        }
    }

    /// Signs this [`Session`] with the provided [`EncodingKey`].
    ///
    /// # Errors
    ///
    /// If [`jsonwebtoken`] fails to encode this [`Session`].
    pub fn sign(
        &self,
        key: &EncodingKey,
    ) -> Result<Token, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&Header::new(Token::ALGORITHM), self, key)
            .map(Token)
    }
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Eq, From, PartialEq)]
#[as_ref(str)]
#[debug("Token(*)")]
#[from(String, &str)]
pub struct Token(String);

impl Token {
    /// [`Algorithm`] every [`Token`] is signed with.
    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Verifies this [`Token`] against the provided [`DecodingKey`] and the
    /// current time, returning the [`Session`] it asserts.
    ///
    /// # Errors
    ///
    /// - [`VerificationError::InvalidSignature`] if this [`Token`] is not
    ///   signed by the provided [`DecodingKey`];
    /// - [`VerificationError::Expired`] if the current time is past the
    ///   [`Session::expires_at`];
    /// - [`VerificationError::Malformed`] if this [`Token`] doesn't represent
    ///   a [`Session`].
    pub fn verify(
        &self,
        key: &DecodingKey,
    ) -> Result<Session, VerificationError> {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<Session>(&self.0, key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

/// Error of [`Token::verify()`].
#[derive(Debug, Display, Error)]
pub enum VerificationError {
    /// Signature doesn't match the [`Token`] contents.
    #[display("`Token` signature is invalid")]
    InvalidSignature,

    /// [`Session`] has expired.
    #[display("`Session` has expired")]
    Expired,

    /// [`Token`] cannot be parsed into a [`Session`].
    #[display("`Token` is malformed: {_0}")]
    Malformed(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        if matches!(err.kind(), ErrorKind::InvalidSignature) {
            Self::InvalidSignature
        } else if matches!(err.kind(), ErrorKind::ExpiredSignature) {
            Self::Expired
        } else {
            Self::Malformed(err)
        }
    }
}

/// [`DateTime`] of a [`Session`] issuance.
pub type IssuanceDateTime = DateTimeOf<(Session, unit::Issuance)>;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
