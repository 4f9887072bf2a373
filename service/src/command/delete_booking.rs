//! [`Command`] for deleting a [`Booking`].

use common::operations::{By, Delete};
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Booking`] by its [`booking::Id`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteBooking {
    /// ID of the [`Booking`] to delete.
    pub booking_id: booking::Id,
}

/// Output of [`DeleteBooking`] [`Command`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Output {
    /// Number of deleted [`Booking`]s.
    pub deleted_count: u64,
}

impl<Db> Command<DeleteBooking> for Service<Db>
where
    Db: Database<
            Delete<By<Booking, booking::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Sync,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteBooking) -> Result<Self::Ok, Self::Err> {
        let DeleteBooking { booking_id } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::new(booking_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output {
            deleted_count: deleted.into(),
        })
    }
}

/// Error of [`DeleteBooking`] [`Command`] execution.
pub type ExecutionError = database::Error;
