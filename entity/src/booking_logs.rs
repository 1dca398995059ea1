//! `SeaORM` Entity for the append-only booking audit trail.

use crate::booking_log_action::BookingLogAction;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = entity::booking_logs::Model)]
#[sea_orm(table_name = "booking_logs")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub tenant_id: Id,
    #[schema(value_type = Uuid)]
    pub booking_id: Id,
    #[schema(value_type = Uuid)]
    pub event_id: Id,
    #[schema(value_type = Uuid)]
    pub user_id: Id,
    pub action: BookingLogAction,
    pub note: String,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Bookings,
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Events,
}

impl ActiveModelBehavior for ActiveModel {}
