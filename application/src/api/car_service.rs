//! Car service catalogue API definitions.

use axum::{extract::Path, Extension, Json};
use axum_extra::extract::WithRejection;
use service::{
    domain::{car_service, CarService},
    query::{self, Query as _},
    read,
};

use crate::{AsError, Error, Service, Storage};

/// Lists all the [`CarService`]s.
#[tracing::instrument(skip_all)]
pub async fn list<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
) -> Result<Json<Vec<CarService>>, Error> {
    service
        .execute(query::car_service::All::by(()))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Returns the [`read::car_service::Summary`] of the [`CarService`] with the
/// provided ID, or `null` if there is none.
#[tracing::instrument(skip_all, fields(service.id = %id))]
pub async fn get<Db: Storage>(
    Extension(service): Extension<Service<Db>>,
    WithRejection(Path(id), _): WithRejection<Path<car_service::Id>, Error>,
) -> Result<Json<Option<read::car_service::Summary>>, Error> {
    service
        .execute(query::car_service::ById::by(id))
        .await
        .map(|s| Json(s.map(Into::into)))
        .map_err(AsError::into_error)
}
