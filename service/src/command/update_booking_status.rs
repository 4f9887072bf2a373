//! [`Command`] for updating a [`booking::Status`].

use common::operations::{Update, Updated};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Booking;
use crate::{
    domain::booking,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`booking::Status`] of an existing [`Booking`].
#[derive(Clone, Debug)]
pub struct UpdateBookingStatus {
    /// ID of the [`Booking`] to update.
    pub booking_id: booking::Id,

    /// New [`booking::Status`] of the [`Booking`].
    pub status: booking::Status,
}

/// Output of [`UpdateBookingStatus`] [`Command`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Output {
    /// Number of [`Booking`]s matched by the [`booking::Id`].
    pub matched_count: u64,

    /// Number of [`Booking`]s whose [`booking::Status`] actually changed.
    pub modified_count: u64,
}

impl<Db> Command<UpdateBookingStatus> for Service<Db>
where
    Db: Database<
            Update<(booking::Id, booking::Status)>,
            Ok = Updated,
            Err = Traced<database::Error>,
        > + Sync,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateBookingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        let UpdateBookingStatus { booking_id, status } = cmd;

        let Updated { matched, modified } = self
            .database()
            .execute(Update((booking_id, status)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output {
            matched_count: matched,
            modified_count: modified,
        })
    }
}

/// Error of [`UpdateBookingStatus`] [`Command`] execution.
pub type ExecutionError = database::Error;
