use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use domain::{notification as NotificationApi, Id};
use log::*;

/// GET the caller's unread notifications, newest first
#[utoipa::path(
    get,
    path = "/my-notifications",
    responses(
        (status = 200, description = "Unread notifications", body = [domain::notifications::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET unread notifications for user {}", user.0.id);

    let notifications =
        NotificationApi::find_unread(app_state.db_conn_ref(), &user.caller()).await?;

    Ok(Json(json!({ "notifications": notifications })))
}

/// POST mark one of the caller's notifications as read
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = domain::notifications::Model),
        (status = 400, description = "Malformed notification id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Notification belongs to another user"),
        (status = 404, description = "Notification not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn mark_read(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST mark notification {id} as read");

    let notification = NotificationApi::mark_read(app_state.db_conn_ref(), &user.caller(), id).await?;

    Ok(Json(json!({
        "message": "Notification marked as read",
        "notification": notification,
    })))
}
