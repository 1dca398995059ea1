use super::error::Error;
use chrono::Utc;
use entity::notification_type::NotificationType;
use entity::notifications::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    ConnectionTrait, QueryOrder,
};

pub async fn create(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    user_id: Id,
    booking_id: Id,
    notification_type: NotificationType,
    title: &str,
    message: String,
) -> Result<Model, Error> {
    debug!("New Notification ({notification_type}) for user {user_id} on booking {booking_id}");

    let now = Utc::now();
    let notification_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        tenant_id: Set(tenant_id),
        user_id: Set(user_id),
        booking_id: Set(booking_id),
        notification_type: Set(notification_type),
        title: Set(title.to_owned()),
        message: Set(message),
        read: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(notification_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// A user's unread notifications, newest first.
pub async fn find_unread_by_user(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Read.eq(false))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

pub async fn find_by_booking(
    db: &impl ConnectionTrait,
    booking_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::BookingId.eq(booking_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn mark_as_read(db: &impl ConnectionTrait, notification: Model) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Unchanged(notification.id),
        tenant_id: Unchanged(notification.tenant_id),
        user_id: Unchanged(notification.user_id),
        booking_id: Unchanged(notification.booking_id),
        notification_type: Unchanged(notification.notification_type),
        title: Unchanged(notification.title),
        message: Unchanged(notification.message),
        read: Set(true),
        created_at: Unchanged(notification.created_at),
        updated_at: Set(Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}
