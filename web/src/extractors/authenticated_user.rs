use crate::extractors::RejectionType;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_login::AuthSession;
use domain::authorization::Caller;
use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use domain::users;
use log::*;
use tower_sessions::Session;

pub(crate) struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub(crate) fn caller(&self) -> Caller {
        Caller::from(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    // Wraps axum-login's AuthSession: yields the logged in user or a 401, and
    // touches the session so an active user is not logged out on inactivity.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: domain::user::AuthSession = AuthSession::from_request_parts(parts, state)
            .await
            .map_err(|(_status, msg)| {
                error!("Auth session layer is missing: {msg}");
                crate::Error::from(DomainError {
                    source: None,
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        msg.to_string(),
                    )),
                })
            })?;

        if let Ok(tower_session) = Session::from_request_parts(parts, state).await {
            if let Err(e) = tower_session.save().await {
                warn!("Failed to touch session for activity renewal: {e:?}");
            } else {
                trace!("Session touched for activity renewal");
            }
        }

        match session.user {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => Err(DomainError::unauthenticated().into()),
        }
    }
}
