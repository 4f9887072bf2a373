//! [`Query`] collection related to [`Booking`]s.

use common::operations::By;

use crate::domain::{user, Booking};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Booking`]s owned by the provided [`user::Email`], or all of
/// them if [`None`].
pub type ByOwner = DatabaseQuery<By<Vec<Booking>, Option<user::Email>>>;
