//! Access gate guarding the routes requiring a [`Session`].

use axum::{extract::Request, middleware::Next, response::Response, Extension};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use service::{
    command::{self, authorize_user_session, Command as _},
    domain::user::{session, Session},
};
use tracing as log;

use crate::{api::auth::COOKIE_NAME, define_error, AsError, Error, Service};

/// Middleware authorizing the [`Session`] carried by the request cookie.
///
/// On success, the authorized [`Session`] is put into the request extensions
/// for the next handlers.
///
/// # Errors
///
/// - `MISSING_TOKEN` (`401`) if the request carries no session cookie;
/// - `INVALID_TOKEN` (`403`) if the session token doesn't verify.
pub async fn gate<Db>(
    Extension(service): Extension<Service<Db>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Error>
where
    Db: Clone + Send + Sync + 'static,
{
    let token = jar
        .get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(session::Token::from)
        .ok_or_else(|| {
            log::debug!("request carries no `Session` cookie");
            Error::from(GateError::MissingToken)
        })?;

    let session = service
        .execute(command::AuthorizeUserSession { token })
        .await
        .map_err(AsError::into_error)?;

    drop(req.extensions_mut().insert::<Session>(session));

    Ok(next.run(req).await)
}

impl AsError for authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Verification(_) => Some(GateError::InvalidToken.into()),
        }
    }
}

define_error! {
    enum GateError {
        #[code = "MISSING_TOKEN"]
        #[status = UNAUTHORIZED]
        #[message = "Unauthorized access"]
        MissingToken,

        #[code = "INVALID_TOKEN"]
        #[status = FORBIDDEN]
        #[message = "unauthorized access"]
        InvalidToken,
    }
}
