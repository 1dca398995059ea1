use super::error::Error;
use chrono::Utc;
use entity::tenants::{ActiveModel, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};

pub async fn create(db: &impl ConnectionTrait, name: &str) -> Result<Model, Error> {
    debug!("New Tenant to be inserted: {name}");

    let now = Utc::now();
    let tenant_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        name: Set(name.to_owned()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(tenant_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().all(db).await?)
}
