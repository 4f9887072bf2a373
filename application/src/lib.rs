//! Application provides HTTP API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
pub mod error;
pub mod gate;

use axum::{
    middleware,
    routing::{get, patch, post},
    Extension, Router,
};
use common::operations::{By, Delete, Insert, Select, Update, Updated};
use service::{
    domain::{booking, car_service, user, Booking, CarService},
    infra::{database, Database, Postgres},
};
use tracerr::Traced;
// Used in binary.
use axum_client_ip as _;
use clap as _;
use futures as _;
use refinery as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;
// Used in tests.
#[cfg(test)]
use tower as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
    gate::gate,
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service<Db = Postgres> = service::Service<Db>;

/// [`Database`] able to serve every route of the [`router()`].
pub trait Storage:
    Database<
        Select<By<Vec<CarService>, ()>>,
        Ok = Vec<CarService>,
        Err = Traced<database::Error>,
    > + Database<
        Select<By<Option<CarService>, car_service::Id>>,
        Ok = Option<CarService>,
        Err = Traced<database::Error>,
    > + Database<
        Select<By<Vec<Booking>, Option<user::Email>>>,
        Ok = Vec<Booking>,
        Err = Traced<database::Error>,
    > + Database<
        Select<By<Option<Booking>, booking::Id>>,
        Ok = Option<Booking>,
        Err = Traced<database::Error>,
    > + Database<Insert<Booking>, Err = Traced<database::Error>>
    + Database<
        Update<(booking::Id, booking::Status)>,
        Ok = Updated,
        Err = Traced<database::Error>,
    > + Database<
        Delete<By<Booking, booking::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    > + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> Storage for T where
    T: Database<
            Select<By<Vec<CarService>, ()>>,
            Ok = Vec<CarService>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarService>, car_service::Id>>,
            Ok = Option<CarService>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Booking>, Option<user::Email>>>,
            Ok = Vec<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<
            Update<(booking::Id, booking::Status)>,
            Ok = Updated,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Booking, booking::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Clone
        + Send
        + Sync
        + 'static
{
}

/// Builds the HTTP API [`Router`] on top of the provided [`Service`].
///
/// Only `GET /bookings` passes through the [`gate()`].
pub fn router<Db: Storage>(service: Service<Db>) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/jwt", post(api::auth::create_session::<Db>))
        .route("/logout", post(api::auth::delete_session))
        .route("/services", get(api::car_service::list::<Db>))
        .route("/services/:id", get(api::car_service::get::<Db>))
        .route(
            "/bookings",
            get(api::booking::list::<Db>)
                .route_layer(middleware::from_fn(gate::<Db>))
                .post(api::booking::create::<Db>),
        )
        .route(
            "/bookings/:id",
            patch(api::booking::update::<Db>)
                .delete(api::booking::delete::<Db>),
        )
        .layer(Extension(service))
}
