use crate::authorization::{self, Caller};
use crate::error::Error;
use crate::promotion;
use crate::{bookings, events, status::Status, Id, IntoQueryFilterMap, IntoUpdateMap};
use chrono::Utc;
use entity_api::{booking, event, mutate, query};
use log::*;
use sea_orm::{DatabaseConnection, IntoActiveModel, TransactionTrait, Value};
use service::locks::KeyedLocks;

/// Columns a client may never change through an update.
const PROTECTED_COLUMNS: [&str; 4] = ["id", "tenant_id", "organizer_id", "created_at"];

/// Events of the caller's tenant matching `params`, soonest first.
pub async fn find_by(
    db: &DatabaseConnection,
    caller: &Caller,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<events::Model>, Error> {
    let mut query_filter_map = params.into_query_filter_map();
    query_filter_map.insert(
        "tenant_id".to_string(),
        Some(Value::Uuid(Some(Box::new(caller.tenant_id)))),
    );

    Ok(
        query::find_by::<events::Entity, events::Column>(
            db,
            query_filter_map,
            events::Column::Date,
        )
        .await?,
    )
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    caller: &Caller,
    id: Id,
) -> Result<events::Model, Error> {
    let event = find_event(db, id).await?;
    authorization::same_tenant(caller, event.tenant_id)?;
    Ok(event)
}

/// Creates an event in the caller's tenant with the caller as organizer.
pub async fn create(
    db: &DatabaseConnection,
    caller: &Caller,
    event_model: events::Model,
) -> Result<events::Model, Error> {
    authorization::staff(caller)?;
    validate_title(&event_model.title)?;
    validate_capacity(event_model.capacity)?;

    let event = event::create(db, caller.tenant_id, caller.user_id, event_model).await?;
    info!("Event {} created in tenant {}", event.id, event.tenant_id);
    Ok(event)
}

/// Applies a partial update to an event.
///
/// A capacity change is checked against the confirmed bookings under the
/// event's lock: shrinking below them is rejected, and growing promotes
/// waitlisted bookings into the new seats.
pub async fn update(
    db: &DatabaseConnection,
    locks: &KeyedLocks<Id>,
    caller: &Caller,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<events::Model, Error> {
    let existing = find_event(db, id).await?;
    authorization::event_manager(caller, &existing)?;

    let mut update_map = params.into_update_map();
    for column in PROTECTED_COLUMNS {
        update_map.remove(column);
    }

    if let Some(title) = update_map.get("title") {
        match title {
            Value::String(Some(title)) => validate_title(title)?,
            _ => return Err(Error::invalid("Title is required")),
        }
    }

    let new_capacity = match update_map.get("capacity") {
        Some(Value::Int(Some(capacity))) => Some(validate_capacity(*capacity)?),
        Some(_) => return Err(Error::invalid("Capacity must be a whole number")),
        None => None,
    };

    update_map.insert(
        "updated_at".to_string(),
        Some(Value::ChronoDateTimeWithTimeZone(Some(Box::new(
            Utc::now().into(),
        )))),
    );

    let _guard = locks.lock(existing.id).await;
    let txn = db.begin().await?;
    let current = event::find_by_id_for_update(&txn, existing.id).await?;

    if let Some(capacity) = new_capacity {
        let confirmed =
            booking::count_by_event_and_status(&txn, current.id, Status::Confirmed).await?;
        if u64::try_from(capacity).unwrap_or(0) < confirmed {
            return Err(Error::invalid_state(
                "Capacity cannot be lower than the number of confirmed bookings",
            ));
        }
    }

    let previous_capacity = current.capacity;
    let updated = mutate::update::<events::ActiveModel, events::Column>(
        &txn,
        current.into_active_model(),
        update_map,
    )
    .await?;
    txn.commit().await?;

    if updated.capacity > previous_capacity {
        debug!(
            "Event {} capacity raised from {previous_capacity} to {}",
            updated.id, updated.capacity
        );
        // The new capacity is committed; seats left unfilled here are filled
        // by the next cancellation or capacity change.
        if let Err(err) = promotion::fill_open_slots(db, updated.id).await {
            warn!(
                "Waitlist promotion after raising capacity of event {} failed: {err}",
                updated.id
            );
        }
    }

    Ok(updated)
}

/// Deletes an event that has never been booked.
pub async fn delete_by_id(
    db: &DatabaseConnection,
    locks: &KeyedLocks<Id>,
    caller: &Caller,
    id: Id,
) -> Result<(), Error> {
    let existing = find_event(db, id).await?;
    authorization::event_manager(caller, &existing)?;

    let guard = locks.lock(existing.id).await;
    if event::has_bookings(db, existing.id).await? {
        return Err(Error::invalid_state(
            "Cannot delete an event that has bookings",
        ));
    }
    event::delete_by_id(db, existing.id).await?;
    drop(guard);
    locks.remove(&existing.id);

    info!("Event {} deleted", existing.id);
    Ok(())
}

/// The bookings of one event in admission order; staff of the event's tenant only.
pub async fn find_bookings(
    db: &DatabaseConnection,
    caller: &Caller,
    id: Id,
) -> Result<Vec<bookings::Model>, Error> {
    let event = find_event(db, id).await?;
    authorization::same_tenant(caller, event.tenant_id)?;
    authorization::staff(caller)?;
    Ok(booking::find_by_event(db, event.id).await?)
}

fn validate_title(title: &str) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::invalid("Title is required"));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> Result<i32, Error> {
    if capacity < 1 {
        return Err(Error::invalid("Capacity must be at least 1"));
    }
    Ok(capacity)
}

async fn find_event(db: &DatabaseConnection, id: Id) -> Result<events::Model, Error> {
    event::find_by_id(db, id)
        .await
        .map_err(|e| Error::from(e).describe_not_found("Event not found"))
}
