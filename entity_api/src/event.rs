use super::error::Error;
use chrono::{DateTime, FixedOffset, Utc};
use entity::events::{ActiveModel, Column, Entity, Model};
use entity::{bookings, Id};
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::Set,
    ConnectionTrait, PaginatorTrait, QueryOrder, QuerySelect,
};

pub async fn create(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    organizer_id: Id,
    event_model: Model,
) -> Result<Model, Error> {
    debug!("New Event Model to be inserted: {event_model:?}");

    let now = Utc::now();
    let event_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        tenant_id: Set(tenant_id),
        organizer_id: Set(organizer_id),
        title: Set(event_model.title),
        description: Set(event_model.description),
        date: Set(event_model.date),
        capacity: Set(event_model.capacity),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(event_active_model.insert(db).await?)
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let event = find_by_id(db, id).await?;

    event.delete(db).await?;

    Ok(())
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Reads the event row with `SELECT ... FOR UPDATE` so that concurrent
/// transactions touching the same event's bookings queue up behind it.
pub async fn find_by_id_for_update(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_tenant(db: &impl ConnectionTrait, tenant_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .order_by_asc(Column::Date)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Events of a tenant whose date is at or after `from`, soonest first.
pub async fn find_upcoming_by_tenant(
    db: &impl ConnectionTrait,
    tenant_id: Id,
    from: DateTime<FixedOffset>,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .filter(Column::Date.gte(from))
        .order_by_asc(Column::Date)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn count_by_tenant(db: &impl ConnectionTrait, tenant_id: Id) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .count(db)
        .await?)
}

/// Whether any booking, in any status, references the event.
pub async fn has_bookings(db: &impl ConnectionTrait, id: Id) -> Result<bool, Error> {
    let count = bookings::Entity::find()
        .filter(bookings::Column::EventId.eq(id))
        .count(db)
        .await?;

    Ok(count > 0)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn workshop() -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            tenant_id: Id::new_v4(),
            organizer_id: Id::new_v4(),
            title: "Web Development Workshop".to_owned(),
            description: None,
            date: now.into(),
            capacity: 5,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_id_for_update_returns_the_event() -> Result<(), Error> {
        let event = workshop();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![event.clone()]])
            .into_connection();

        assert_eq!(find_by_id_for_update(&db, event.id).await?, event);

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_returns_not_found_for_unknown_event() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(EntityApiErrorKind::RecordNotFound)
        );
    }
}
