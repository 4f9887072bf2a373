//! In-memory [`Database`] implementation.

use std::sync::Arc;

use common::operations::{By, Delete, Insert, Select, Update, Updated};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{booking, car_service, user, Booking, CarService},
    infra::{database, Database},
};

/// In-memory [`Database`] client.
///
/// Keeps documents in insertion order and shares them between its clones.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`CarService`]s.
    services: Arc<RwLock<Vec<CarService>>>,

    /// Stored [`Booking`]s.
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Memory`] client pre-populated with the provided
    /// [`CarService`]s and [`Booking`]s.
    #[must_use]
    pub fn with(
        services: impl IntoIterator<Item = CarService>,
        bookings: impl IntoIterator<Item = Booking>,
    ) -> Self {
        Self {
            services: Arc::new(RwLock::new(services.into_iter().collect())),
            bookings: Arc::new(RwLock::new(bookings.into_iter().collect())),
        }
    }
}

impl Database<Select<By<Vec<CarService>, ()>>> for Memory {
    type Ok = Vec<CarService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<CarService>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.services.read().await.clone())
    }
}

impl Database<Select<By<Option<CarService>, car_service::Id>>> for Memory {
    type Ok = Option<CarService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<CarService>, car_service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .services
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

impl Database<Select<By<Vec<Booking>, Option<user::Email>>>> for Memory {
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, Option<user::Email>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| email.is_none() || b.email == email)
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Option<Booking>, booking::Id>>> for Memory {
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }
}

impl Database<Insert<Booking>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.bookings.write().await.push(booking);
        Ok(())
    }
}

impl Database<Update<(booking::Id, booking::Status)>> for Memory {
    type Ok = Updated;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update((id, status)): Update<(booking::Id, booking::Status)>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut bookings = self.bookings.write().await;
        let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(Updated::default());
        };
        if booking.status.as_ref() == Some(&status) {
            return Ok(Updated {
                matched: 1,
                modified: 0,
            });
        }
        booking.status = Some(status);
        Ok(Updated {
            matched: 1,
            modified: 1,
        })
    }
}

impl Database<Delete<By<Booking, booking::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok(bookings.len() < before)
    }
}
