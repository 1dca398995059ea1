use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::event::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use domain::{event as EventApi, events::Model, Id};
use log::*;

/// GET the events of the caller's tenant, soonest first
#[utoipa::path(
    get,
    path = "/events",
    params(IndexParams),
    responses(
        (status = 200, description = "Events of the caller's tenant", body = [domain::events::Model]),
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
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET events by filter: {params:?}");

    let events = EventApi::find_by(app_state.db_conn_ref(), &user.caller(), params).await?;

    Ok(Json(json!({ "events": events })))
}

/// GET a particular event specified by its id
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event id to retrieve")
    ),
    responses(
        (status = 200, description = "The event", body = domain::events::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Event belongs to another tenant"),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET event by id: {id}");

    let event = EventApi::find_by_id(app_state.db_conn_ref(), &user.caller(), id).await?;

    Ok(Json(json!({ "event": event })))
}

/// POST create a new event organized by the caller
#[utoipa::path(
    post,
    path = "/events",
    request_body = domain::events::Model,
    responses(
        (status = 201, description = "Successfully created a new event", body = domain::events::Model),
        (status = 400, description = "Missing title or capacity below 1"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organizers and admins only"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(event_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST create a new event: {:?}", event_model.title);

    let event = EventApi::create(app_state.db_conn_ref(), &user.caller(), event_model).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Event created successfully", "event": event })),
    ))
}

/// PUT update an event; raising its capacity promotes waitlisted bookings
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the event to update")
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the event", body = domain::events::Model),
        (status = 400, description = "Invalid field, or capacity below the confirmed bookings"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not manage this event"),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT update event {id} with: {params:?}");

    let event = EventApi::update(
        app_state.db_conn_ref(),
        app_state.event_locks_ref(),
        &user.caller(),
        id,
        params,
    )
    .await?;

    Ok(Json(json!({ "message": "Event updated successfully", "event": event })))
}

/// DELETE an event that has no bookings
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the event to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted the event"),
        (status = 400, description = "The event has bookings"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not manage this event"),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE event {id}");

    EventApi::delete_by_id(
        app_state.db_conn_ref(),
        app_state.event_locks_ref(),
        &user.caller(),
        id,
    )
    .await?;

    Ok(Json(json!({ "message": "Event deleted successfully" })))
}

/// GET every booking of an event, in booking order
#[utoipa::path(
    get,
    path = "/events/{id}/bookings",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Bookings of the event", body = [domain::bookings::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organizers and admins of the event's tenant only"),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn bookings(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET bookings of event {id}");

    let bookings = EventApi::find_bookings(app_state.db_conn_ref(), &user.caller(), id).await?;

    Ok(Json(json!({ "bookings": bookings })))
}
