use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    #[sea_orm(string_value = "attendee")]
    #[default]
    Attendee,
    #[sea_orm(string_value = "organizer")]
    Organizer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Organizers and admins manage a tenant's events and bookings.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Organizer | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Attendee => write!(fmt, "attendee"),
            Role::Organizer => write!(fmt, "organizer"),
            Role::Admin => write!(fmt, "admin"),
        }
    }
}
