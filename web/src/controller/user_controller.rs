use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use domain::user as UserApi;
use log::*;

/// GET the users of the caller's tenant, for booking on their behalf
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users of the caller's tenant", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organizers and admins only"),
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
    debug!("GET users of tenant {}", user.0.tenant_id);

    let users = UserApi::find_by_tenant(app_state.db_conn_ref(), &user.caller()).await?;

    Ok(Json(json!({ "users": users })))
}
