//! [`Command`] for authorizing a [`Session`].

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::{session, Session},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its [`session::Token`].
///
/// Nothing is looked up in the [`Database`]: a [`session::Token`] is valid
/// as long as its signature matches and it hasn't expired.
///
/// [`Database`]: crate::infra::Database
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Sync,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        token
            .verify(&self.config().jwt_decoding_key)
            .inspect_err(|e| log::debug!("`Session` rejected: {e}"))
            .map_err(tracerr::from_and_wrap!(=> E))
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`session::Token`] verification failed.
    #[display("`Session` verification failed: {_0}")]
    Verification(session::VerificationError),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use crate::{
        command::{AuthorizeUserSession, Command as _, CreateUserSession},
        domain::user::{session::VerificationError, Identity},
        infra::Memory,
        Config, Service,
    };

    use super::ExecutionError;

    fn identity() -> Identity {
        Identity::new("a@x.com".parse().unwrap())
    }

    #[tokio::test]
    async fn authorizes_created_session() {
        let svc = Service::new(Config::with_secret("s3cr3t"), Memory::new());

        let created = svc
            .execute(CreateUserSession {
                identity: identity(),
            })
            .await
            .unwrap();
        assert_eq!(
            created.session.expires_at.coerce::<()>()
                - created.session.issued_at.coerce(),
            Duration::from_secs(60 * 60),
        );

        let session = svc
            .execute(AuthorizeUserSession {
                token: created.token,
            })
            .await
            .unwrap();
        assert_eq!(session.identity, identity());
    }

    #[tokio::test]
    async fn rejects_session_of_rotated_secret() {
        let old = Service::new(Config::with_secret("old"), Memory::new());
        let new = Service::new(Config::with_secret("new"), Memory::new());

        let token = old
            .execute(CreateUserSession {
                identity: identity(),
            })
            .await
            .unwrap()
            .token;

        let err = new.execute(AuthorizeUserSession { token }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Verification(VerificationError::InvalidSignature),
        ));
    }
}
