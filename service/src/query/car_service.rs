//! [`Query`] collection related to [`CarService`]s.

use common::operations::By;

use crate::domain::{car_service, CarService};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`CarService`]s.
pub type All = DatabaseQuery<By<Vec<CarService>, ()>>;

/// Queries a [`CarService`] by its [`car_service::Id`].
pub type ById = DatabaseQuery<By<Option<CarService>, car_service::Id>>;
