//! Session cookie API definitions.

use axum::{Extension, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar, WithRejection,
};
use serde::Serialize;
use service::{
    command::{self, create_user_session, Command as _},
    domain::user::{session, Identity},
};

use crate::{AsError, Error, Service};

/// Name of the cookie carrying a [`session::Token`].
pub const COOKIE_NAME: &str = "token";

/// Creates a new session cookie carrying the provided [`session::Token`].
#[must_use]
pub fn issue_cookie(token: &session::Token) -> Cookie<'static> {
    cookie(AsRef::<str>::as_ref(token).to_owned())
}

/// Creates a cookie removing the session cookie from a client.
#[must_use]
pub fn revoke_cookie() -> Cookie<'static> {
    let mut cookie = cookie(String::new());
    cookie.make_removal();
    cookie
}

/// Builds a session cookie with the provided `value`.
fn cookie(value: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

/// Result of a session cookie operation.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Success {
    /// Always `true`.
    pub success: bool,
}

/// Signs a new session for the provided [`Identity`] and sets it as a
/// cookie.
///
/// # Errors
///
/// - `INVALID_REQUEST` if the [`Identity`] has no non-empty email.
#[tracing::instrument(skip_all, fields(email = %identity.email))]
pub async fn create_session<Db>(
    Extension(service): Extension<Service<Db>>,
    jar: CookieJar,
    WithRejection(Json(identity), _): WithRejection<Json<Identity>, Error>,
) -> Result<(CookieJar, Json<Success>), Error>
where
    Db: Clone + Send + Sync + 'static,
{
    let create_user_session::Output { token, session } = service
        .execute(command::CreateUserSession { identity })
        .await
        .map_err(AsError::into_error)?;

    tracing::debug!(
        expires_at = session.expires_at.to_rfc3339(),
        "`Session` created",
    );

    Ok((jar.add(issue_cookie(&token)), Json(Success { success: true })))
}

/// Clears the session cookie.
///
/// Doesn't require the request to carry a session cookie.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn delete_session(jar: CookieJar) -> (CookieJar, Json<Success>) {
    (jar.add(revoke_cookie()), Json(Success { success: true }))
}

impl AsError for create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::JsonWebTokenEncodeError(_) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use axum_extra::extract::cookie::SameSite;
    use service::domain::user::session;

    use super::{issue_cookie, revoke_cookie};

    #[test]
    fn issued_cookie_attributes() {
        let cookie = issue_cookie(&session::Token::from("a.b.c"));

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "a.b.c");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), None);
    }

    #[test]
    fn revoked_cookie_attributes() {
        let cookie = revoke_cookie();

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_some_and(|age| age.is_zero()));
        assert!(cookie.expires_datetime().is_some());
    }
}
