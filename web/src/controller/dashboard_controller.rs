use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use domain::dashboard as DashboardApi;
use log::*;

/// GET the tenant dashboard: upcoming events with fill rates, booking totals
/// and the most recent booking activity
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard of the caller's tenant", body = domain::dashboard::Dashboard),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organizers and admins only"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET dashboard for tenant {}", user.0.tenant_id);

    let dashboard = DashboardApi::summary(
        app_state.db_conn_ref(),
        &user.caller(),
        Utc::now(),
        app_state.config.dashboard_recent_activity_limit,
    )
    .await?;

    Ok(Json(dashboard))
}
