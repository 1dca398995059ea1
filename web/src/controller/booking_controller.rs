use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::booking::{BookEventParams, CancelBookingParams};
use crate::{AppState, Error};
use domain::{booking as BookingApi, status::Status, Id};
use log::*;

/// POST book an event for the caller, or for `userId` when the caller is an
/// organizer or admin of the event's tenant
#[utoipa::path(
    post,
    path = "/book-event",
    request_body = BookEventParams,
    responses(
        (status = 201, description = "Booking confirmed, or added to the waitlist when the event is full", body = domain::bookings::Model),
        (status = 400, description = "Missing event id, or an active booking already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Event or user belongs to another tenant"),
        (status = 404, description = "Event or user not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<BookEventParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Book event from user {}: {params:?}", user.0.id);

    let booking = BookingApi::create(
        app_state.db_conn_ref(),
        app_state.event_locks_ref(),
        &user.caller(),
        params.event_id,
        params.user_id,
    )
    .await?;

    let message = match booking.status {
        Status::Waitlisted => "Added to waitlist",
        _ => "Booking confirmed",
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": message, "booking": booking })),
    ))
}

/// POST cancel a booking; a freed seat goes to the oldest waitlisted booking
#[utoipa::path(
    post,
    path = "/cancel-booking",
    request_body = CancelBookingParams,
    responses(
        (status = 200, description = "Booking canceled", body = domain::bookings::Model),
        (status = 400, description = "Missing booking id, or the booking is already canceled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn cancel(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CancelBookingParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Cancel booking from user {}: {params:?}", user.0.id);

    let booking = BookingApi::cancel(
        app_state.db_conn_ref(),
        app_state.event_locks_ref(),
        &user.caller(),
        params.booking_id,
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Booking canceled successfully", "booking": booking })),
    ))
}

/// GET the caller's bookings, newest first, each with its event
#[utoipa::path(
    get,
    path = "/my-bookings",
    responses(
        (status = 200, description = "The caller's bookings", body = [domain::booking::BookingWithEvent]),
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
    debug!("GET bookings for user {}", user.0.id);

    let bookings = BookingApi::find_by_caller(app_state.db_conn_ref(), &user.caller()).await?;

    Ok(Json(json!({ "bookings": bookings })))
}

/// GET the audit log of a booking, oldest entry first
#[utoipa::path(
    get,
    path = "/bookings/{id}/logs",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Log entries of the booking", body = [domain::booking_logs::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn logs(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET logs of booking {id}");

    let logs = BookingApi::find_logs(app_state.db_conn_ref(), &user.caller(), id).await?;

    Ok(Json(json!({ "logs": logs })))
}
