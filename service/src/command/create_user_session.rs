//! [`Command`] for creating a [`Session`].

use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::session::Token;
use crate::{
    domain::user::{session, Identity, Session},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`].
///
/// Credentials of the [`Identity`] are not checked: the caller is trusted to
/// have authenticated it already.
#[derive(Clone, Debug, From)]
pub struct CreateUserSession {
    /// [`Identity`] to create a [`Session`] for.
    pub identity: Identity,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// Created [`Session`].
    pub session: Session,
}

impl<Db> Command<CreateUserSession> for Service<Db>
where
    Db: Sync,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { identity } = cmd;

        let session = Session::new(identity, self.config().session_ttl);
        let token = session
            .sign(&self.config().jwt_encoding_key)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        Ok(Output { token, session })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),
}
