use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The kind of booking event a notification informs its user about.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum NotificationType {
    #[sea_orm(string_value = "booking_confirmed")]
    BookingConfirmed,
    #[sea_orm(string_value = "waitlisted")]
    Waitlisted,
    #[sea_orm(string_value = "waitlist_promoted")]
    WaitlistPromoted,
    #[sea_orm(string_value = "booking_canceled")]
    BookingCanceled,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::BookingConfirmed => write!(fmt, "booking_confirmed"),
            NotificationType::Waitlisted => write!(fmt, "waitlisted"),
            NotificationType::WaitlistPromoted => write!(fmt, "waitlist_promoted"),
            NotificationType::BookingCanceled => write!(fmt, "booking_canceled"),
        }
    }
}
