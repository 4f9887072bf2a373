//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_booking;
pub mod create_user_session;
pub mod delete_booking;
pub mod update_booking_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_booking::CreateBooking, create_user_session::CreateUserSession,
    delete_booking::DeleteBooking,
    update_booking_status::UpdateBookingStatus,
};
