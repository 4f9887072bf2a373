//! Booking API definitions.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, delete_booking, update_booking_status, Command as _},
    domain::{
        booking,
        user::{self, Session},
        Booking, Details,
    },
    query,
};

use crate::{define_error, AsError, Error, Service, Storage};

/// Query parameters of the [`list()`] handler.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Owner {
    /// Email of the user whose [`Booking`]s are requested.
    pub email: Option<String>,
}

/// Checks that the [`Session`] owner may read the [`Booking`]s of the
/// `requested` owner, returning the email to filter them by.
///
/// # Errors
///
/// - `IDENTITY_MISMATCH` if the `requested` owner is not the [`Session`]
///   owner.
pub fn authorize_owner(
    session: &Session,
    requested: Option<&str>,
) -> Result<Option<user::Email>, Error> {
    let own = &session.identity.email;
    match requested {
        None => Ok(None),
        Some(email) if email == AsRef::<str>::as_ref(own) => {
            Ok(Some(own.clone()))
        }
        Some(_) => Err(OwnershipError::IdentityMismatch.into()),
    }
}

/// Lists the [`Booking`]s of the [`Session`] owner.
///
/// # Errors
///
/// - `IDENTITY_MISMATCH` if the `email` parameter differs from the
///   [`Session`] owner's one.
#[tracing::instrument(
    skip_all,
    fields(
        email = ?owner.email,
        session.email = %session.identity.email,
    ),
)]
pub async fn list<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    Extension(session): Extension<Session>,
    WithRejection(Query(owner), _): WithRejection<Query<Owner>, Error>,
) -> Result<Json<Vec<Booking>>, Error> {
    let email = authorize_owner(&session, owner.email.as_deref())?;

    service
        .execute(query::booking::ByOwner::by(email))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Request body of the [`create()`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct NewBooking {
    /// Email of the user owning the [`Booking`].
    #[serde(default)]
    pub email: Option<user::Email>,

    /// [`booking::Status`] of the [`Booking`].
    #[serde(default)]
    pub status: Option<booking::Status>,

    /// Other fields of the [`Booking`].
    #[serde(flatten)]
    pub details: Details,
}

/// Result of the [`create()`] handler.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    /// Always `true`.
    pub acknowledged: bool,

    /// ID of the created [`Booking`].
    pub inserted_id: booking::Id,
}

/// Stores a new [`Booking`].
#[tracing::instrument(skip_all, fields(email = ?new.email))]
pub async fn create<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    WithRejection(Json(new), _): WithRejection<Json<NewBooking>, Error>,
) -> Result<Json<InsertResult>, Error> {
    let NewBooking {
        email,
        status,
        details,
    } = new;

    let booking = service
        .execute(command::CreateBooking {
            email,
            status,
            details,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(InsertResult {
        acknowledged: true,
        inserted_id: booking.id,
    }))
}

/// Request body of the [`update()`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct StatusUpdate {
    /// New [`booking::Status`] of the [`Booking`].
    pub status: booking::Status,
}

/// Result of the [`update()`] handler.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// Always `true`.
    pub acknowledged: bool,

    /// Number of [`Booking`]s matched by the ID.
    pub matched_count: u64,

    /// Number of [`Booking`]s actually modified.
    pub modified_count: u64,
}

/// Updates the [`booking::Status`] of the [`Booking`] with the provided ID.
#[tracing::instrument(
    skip_all,
    fields(booking.id = %id, status = %update.status),
)]
pub async fn update<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    WithRejection(Path(id), _): WithRejection<Path<booking::Id>, Error>,
    WithRejection(Json(update), _): WithRejection<Json<StatusUpdate>, Error>,
) -> Result<Json<UpdateResult>, Error> {
    let update_booking_status::Output {
        matched_count,
        modified_count,
    } = service
        .execute(command::UpdateBookingStatus {
            booking_id: id,
            status: update.status,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(UpdateResult {
        acknowledged: true,
        matched_count,
        modified_count,
    }))
}

/// Result of the [`delete()`] handler.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Always `true`.
    pub acknowledged: bool,

    /// Number of deleted [`Booking`]s.
    pub deleted_count: u64,
}

/// Deletes the [`Booking`] with the provided ID.
#[tracing::instrument(skip_all, fields(booking.id = %id))]
pub async fn delete<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    WithRejection(Path(id), _): WithRejection<Path<booking::Id>, Error>,
) -> Result<Json<DeleteResult>, Error> {
    let delete_booking::Output { deleted_count } = service
        .execute(command::DeleteBooking { booking_id: id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(DeleteResult {
        acknowledged: true,
        deleted_count,
    }))
}

define_error! {
    enum OwnershipError {
        #[code = "IDENTITY_MISMATCH"]
        #[status = FORBIDDEN]
        #[message = "Forbidden access"]
        IdentityMismatch,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use service::domain::user::{Identity, Session};

    use super::authorize_owner;

    fn session(email: &str) -> Session {
        Session::new(
            Identity::new(email.parse().unwrap()),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn allows_own_bookings() {
        assert_eq!(
            authorize_owner(&session("a@x.com"), Some("a@x.com"))
                .unwrap()
                .map(|e| e.to_string()),
            Some("a@x.com".to_owned()),
        );
    }

    #[test]
    fn allows_unfiltered_listing() {
        assert_eq!(authorize_owner(&session("a@x.com"), None).unwrap(), None);
    }

    #[test]
    fn rejects_foreign_bookings() {
        for requested in ["b@x.com", "A@x.com", "", "not an email"] {
            let err = authorize_owner(&session("a@x.com"), Some(requested))
                .unwrap_err();
            assert_eq!(err.code, "IDENTITY_MISMATCH", "`{requested}`");
            assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
        }
    }
}
