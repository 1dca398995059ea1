//! Route-level authorization.
//!
//! Rules here only look at who the caller is. Rules that depend on a record
//! (its tenant, its owner) run in the `domain` layer once the record is loaded.

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use axum::{
    async_trait,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use domain::{error::Error as DomainError, users, Id};
use log::*;

/// A single authorization rule: may the authenticated user proceed?
///
/// The rule receives the shared `AppState`, the authenticated user and any
/// extra [`Id`] arguments the route supplies.
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, user: &users::Model, args: Vec<Id>) -> bool;
}

/// Pairs a [`Check`] with the arguments it is evaluated with.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, user: &users::Model) -> bool {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Runs `checks` in order and answers 403 on the first one that fails;
/// otherwise runs the wrapped handler.
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_user: users::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> impl IntoResponse {
    for check in checks {
        if !check.check(app_state, &authenticated_user).await {
            warn!(
                "User {} denied access to {}",
                authenticated_user.id,
                request.uri()
            );
            return crate::Error::from(DomainError::forbidden()).into_response();
        }
    }
    next.run(request).await
}

/// Only organizers and admins may proceed.
/// Intended to be given to `axum::middleware::from_fn_with_state` in the router.
pub(crate) async fn staff(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsStaff, vec![])];
    authorize(&app_state, user, request, next, checks).await
}

pub struct UserIsStaff;

#[async_trait]
impl Check for UserIsStaff {
    async fn eval(&self, _app_state: &AppState, user: &users::Model, _args: Vec<Id>) -> bool {
        user.role.is_staff()
    }
}
