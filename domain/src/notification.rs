use crate::authorization::{self, Caller};
use crate::error::Error;
use crate::{notifications, Id};
use entity_api::notification;
use sea_orm::DatabaseConnection;

/// The caller's unread notifications, newest first.
pub async fn find_unread(
    db: &DatabaseConnection,
    caller: &Caller,
) -> Result<Vec<notifications::Model>, Error> {
    Ok(notification::find_unread_by_user(db, caller.user_id).await?)
}

/// Marks one of the caller's own notifications as read. Marking an already
/// read notification again returns it unchanged.
pub async fn mark_read(
    db: &DatabaseConnection,
    caller: &Caller,
    id: Id,
) -> Result<notifications::Model, Error> {
    let existing = notification::find_by_id(db, id)
        .await
        .map_err(|e| Error::from(e).describe_not_found("Notification not found"))?;
    authorization::owner(caller, existing.tenant_id, existing.user_id)?;

    if existing.read {
        return Ok(existing);
    }
    Ok(notification::mark_as_read(db, existing).await?)
}
