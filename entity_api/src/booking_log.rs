use super::error::Error;
use chrono::Utc;
use entity::booking_log_action::BookingLogAction;
use entity::booking_logs::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set};

pub async fn create(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    booking_id: Id,
    event_id: Id,
    user_id: Id,
    action: BookingLogAction,
    note: &str,
) -> Result<Model, Error> {
    debug!("New BookingLog ({action}) for booking {booking_id}");

    let booking_log_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        tenant_id: Set(tenant_id),
        booking_id: Set(booking_id),
        event_id: Set(event_id),
        user_id: Set(user_id),
        action: Set(action),
        note: Set(note.to_owned()),
        created_at: Set(Utc::now().into()),
    };

    Ok(booking_log_active_model.insert(db).await?)
}

/// The `limit` most recent log entries of a tenant, newest first.
pub async fn find_recent_by_tenant(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(db)
        .await?)
}

/// The history of a single booking, oldest first.
pub async fn find_by_booking(
    db: &impl ConnectionTrait,
    booking_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::BookingId.eq(booking_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}
