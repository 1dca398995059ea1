use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_login::AuthSession;
use domain::error::Error as DomainError;

/// Authentication middleware that answers 401 Unauthorized for requests without a
/// logged in session, instead of the redirect axum-login's `login_required!` issues.
pub async fn require_auth(
    auth_session: AuthSession<domain::user::Backend>,
    request: Request,
    next: Next,
) -> Response {
    match auth_session.user {
        Some(_user) => next.run(request).await,
        None => crate::Error::from(DomainError::unauthenticated()).into_response(),
    }
}
