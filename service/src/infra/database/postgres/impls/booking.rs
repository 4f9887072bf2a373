//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update, Updated};
use postgres_types::Json;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking, Details},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Converts the provided [`Row`] into a [`Booking`].
fn from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        email: row.get("email"),
        status: row.get("status"),
        details: row.get::<_, Json<Details>>("details").0,
    }
}

impl<C> Database<Select<By<Vec<Booking>, Option<user::Email>>>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, Option<user::Email>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        const SQL: &str = "\
            SELECT id, email, status, details \
            FROM bookings \
            WHERE $1::TEXT IS NULL OR email = $1::TEXT \
            ORDER BY created_at, id";
        Ok(self
            .query(SQL, &[&email])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, email, status, details \
            FROM bookings \
            WHERE id = $1::UUID";
        Ok(self
            .query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .first()
            .map(from_row))
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            email,
            status,
            details,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (id, email, status, details) \
            VALUES ($1::UUID, $2::TEXT, $3::TEXT, $4::JSONB)";
        self.exec(SQL, &[&id, &email, &status, &Json(&details)])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Update<(booking::Id, booking::Status)>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = Updated;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update((id, status)): Update<(booking::Id, booking::Status)>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            WITH matched AS ( \
                SELECT id FROM bookings WHERE id = $1::UUID \
            ), modified AS ( \
                UPDATE bookings \
                SET status = $2::TEXT \
                WHERE id = $1::UUID \
                  AND status IS DISTINCT FROM $2::TEXT \
                RETURNING id \
            ) \
            SELECT (SELECT COUNT(*) FROM matched) AS matched, \
                   (SELECT COUNT(*) FROM modified) AS modified";
        Ok(self
            .query(SQL, &[&id, &status])
            .await
            .map_err(tracerr::wrap!())?
            .first()
            .map(|row| Updated {
                matched: row.get::<_, i64>("matched").unsigned_abs(),
                modified: row.get::<_, i64>("modified").unsigned_abs(),
            })
            .unwrap_or_default())
    }
}

impl<C> Database<Delete<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection + Sync,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM bookings \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|deleted| deleted > 0)
    }
}
