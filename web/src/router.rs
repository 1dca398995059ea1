use crate::{middleware::auth::require_auth, protect, AppState};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    booking_controller, dashboard_controller, event_controller, health_check_controller,
    notification_controller, user_controller, user_session_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Eventbook API"
        ),
        paths(
            booking_controller::create,
            booking_controller::cancel,
            booking_controller::index,
            booking_controller::logs,
            dashboard_controller::read,
            event_controller::index,
            event_controller::read,
            event_controller::create,
            event_controller::update,
            event_controller::delete,
            event_controller::bookings,
            health_check_controller::health_check,
            notification_controller::index,
            notification_controller::mark_read,
            user_controller::index,
            user_session_controller::login,
            user_session_controller::delete,
        ),
        components(
            schemas(
                domain::bookings::Model,
                domain::booking_logs::Model,
                domain::events::Model,
                domain::notifications::Model,
                domain::users::Model,
                domain::booking::BookingWithEvent,
                domain::dashboard::Dashboard,
                domain::user::Credentials,
                crate::params::booking::BookEventParams,
                crate::params::booking::CancelBookingParams,
                crate::params::event::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "eventbook", description = "Multi-tenant event booking API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state.clone()))
        .merge(booking_routes(app_state.clone()))
        .merge(notification_routes(app_state.clone()))
        .merge(dashboard_routes(app_state.clone()))
        .merge(event_routes(app_state.clone()))
        .merge(user_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/logout", delete(user_session_controller::delete))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn booking_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/book-event", post(booking_controller::create))
        .route("/cancel-booking", post(booking_controller::cancel))
        .route("/my-bookings", get(booking_controller::index))
        .route("/bookings/:id/logs", get(booking_controller::logs))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn notification_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/my-notifications", get(notification_controller::index))
        .route(
            "/notifications/:id/read",
            post(notification_controller::mark_read),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn dashboard_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard_controller::read))
        .route_layer(from_fn_with_state(app_state.clone(), protect::staff))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn event_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(event_controller::index))
        .route("/events/:id", get(event_controller::read))
        .merge(
            // Event management and per-event booking lists
            Router::new()
                .route("/events", post(event_controller::create))
                .route("/events/:id", put(event_controller::update))
                .route("/events/:id", delete(event_controller::delete))
                .route("/events/:id/bookings", get(event_controller::bookings))
                .route_layer(from_fn_with_state(app_state.clone(), protect::staff)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users", get(user_controller::index))
        .route_layer(from_fn_with_state(app_state.clone(), protect::staff))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}
