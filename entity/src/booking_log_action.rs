use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Audit trail action recorded for each booking status transition.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum BookingLogAction {
    #[sea_orm(string_value = "auto_confirm")]
    AutoConfirm,
    #[sea_orm(string_value = "auto_waitlist")]
    AutoWaitlist,
    #[sea_orm(string_value = "cancel_confirmed")]
    CancelConfirmed,
    #[sea_orm(string_value = "promote_from_waitlist")]
    PromoteFromWaitlist,
}

impl std::fmt::Display for BookingLogAction {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingLogAction::AutoConfirm => write!(fmt, "auto_confirm"),
            BookingLogAction::AutoWaitlist => write!(fmt, "auto_waitlist"),
            BookingLogAction::CancelConfirmed => write!(fmt, "cancel_confirmed"),
            BookingLogAction::PromoteFromWaitlist => write!(fmt, "promote_from_waitlist"),
        }
    }
}
