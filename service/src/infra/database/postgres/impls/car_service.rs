//! [`CarService`]-related [`Database`] implementations.

use common::operations::{By, Select};
use postgres_types::Json;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car_service, CarService, Details},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `services` table mapped onto a [`CarService`].
const COLUMNS: &str = "id, title, service_id, img, price, details";

/// Converts the provided [`Row`] into a [`CarService`].
fn from_row(row: &Row) -> CarService {
    CarService {
        id: row.get("id"),
        title: row.get("title"),
        service_id: row.get("service_id"),
        img: row.get("img"),
        price: row.get("price"),
        details: row.get::<_, Json<Details>>("details").0,
    }
}

impl<C> Database<Select<By<Vec<CarService>, ()>>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = Vec<CarService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<CarService>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM services \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(sql.as_str(), &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<CarService>, car_service::Id>>>
    for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = Option<CarService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<CarService>, car_service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM services \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .first()
            .map(from_row))
    }
}
