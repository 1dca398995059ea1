use super::error::Error;
use chrono::Utc;
use entity::bookings::{ActiveModel, Column, Entity, Model};
use entity::status::Status;
use entity::{events, Id};
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    ConnectionTrait, PaginatorTrait, QueryOrder,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A booking together with the event it was made for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookingWithEvent {
    #[serde(flatten)]
    pub booking: Model,
    pub event: Option<events::Model>,
}

pub async fn create(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    event_id: Id,
    user_id: Id,
    status: Status,
) -> Result<Model, Error> {
    debug!("New Booking to be inserted: event {event_id}, user {user_id}, status {status}");

    let now = Utc::now();
    let booking_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        tenant_id: Set(tenant_id),
        event_id: Set(event_id),
        user_id: Set(user_id),
        status: Set(status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(booking_active_model.insert(db).await?)
}

/// Persists a status change for `booking`, leaving every other column untouched.
pub async fn update_status(
    db: &impl ConnectionTrait,
    booking: Model,
    status: Status,
) -> Result<Model, Error> {
    debug!(
        "Booking {} status change: {} -> {status}",
        booking.id, booking.status
    );

    let active_model = ActiveModel {
        id: Unchanged(booking.id),
        tenant_id: Unchanged(booking.tenant_id),
        event_id: Unchanged(booking.event_id),
        user_id: Unchanged(booking.user_id),
        status: Set(status),
        created_at: Unchanged(booking.created_at),
        updated_at: Set(Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// The confirmed or waitlisted booking a user holds for an event, if any.
pub async fn find_active_by_event_and_user(
    db: &impl ConnectionTrait,
    event_id: Id,
    user_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::EventId.eq(event_id))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Status.ne(Status::Canceled))
        .one(db)
        .await?)
}

pub async fn count_by_event_and_status(
    db: &impl ConnectionTrait,
    event_id: Id,
    status: Status,
) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::EventId.eq(event_id))
        .filter(Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn count_by_tenant_and_status(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    status: Status,
) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .filter(Column::Status.eq(status))
        .count(db)
        .await?)
}

/// Head of an event's waitlist: the oldest waitlisted booking, ties broken by id.
pub async fn find_oldest_waitlisted(
    db: &impl ConnectionTrait,
    event_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::EventId.eq(event_id))
        .filter(Column::Status.eq(Status::Waitlisted))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .one(db)
        .await?)
}

pub async fn find_by_event(db: &impl ConnectionTrait, event_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::EventId.eq(event_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Every booking of a user together with the event it is for, newest first.
pub async fn find_by_user_with_events(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<BookingWithEvent>, Error> {
    let results = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .find_also_related(events::Entity)
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?;

    Ok(results
        .into_iter()
        .map(|(booking, event)| BookingWithEvent { booking, event })
        .collect())
}
