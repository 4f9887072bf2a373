//! [`Command`] for creating a new [`Booking`].

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking, Details},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Booking`].
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// [`user::Email`] of the user owning a new [`Booking`].
    pub email: Option<user::Email>,

    /// [`booking::Status`] of a new [`Booking`].
    pub status: Option<booking::Status>,

    /// Other fields of a new [`Booking`].
    pub details: Details,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<Insert<Booking>, Err = Traced<database::Error>> + Sync,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        let CreateBooking {
            email,
            status,
            details,
        } = cmd;

        let booking = Booking::new(email, status, details);

        self.database()
            .execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use serde_json::json;

    use crate::{
        command::{Command as _, CreateBooking},
        domain::{Booking, Details},
        infra::{Database as _, Memory},
        Config, Service,
    };

    #[tokio::test]
    async fn stores_booking() {
        let db = Memory::new();
        let svc = Service::new(Config::with_secret("s3cr3t"), db.clone());
        let details: Details =
            serde_json::from_value(json!({"_id": "spoofed", "price": 120}))
                .unwrap();

        let booking = svc
            .execute(CreateBooking {
                email: Some("a@x.com".parse().unwrap()),
                status: None,
                details,
            })
            .await
            .unwrap();

        assert_eq!(booking.details.get("price"), Some(&json!(120)));
        assert!(!booking.details.contains_key("_id"));
        assert_eq!(
            db.execute(Select(By::<Option<Booking>, _>::new(booking.id)))
                .await
                .unwrap(),
            Some(booking),
        );
    }
}
