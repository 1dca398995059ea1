use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a booking.
///
/// Transitions only ever move forward: `Confirmed -> Canceled`,
/// `Waitlisted -> Confirmed` or `Waitlisted -> Canceled`.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Status {
    #[sea_orm(string_value = "confirmed")]
    #[default]
    Confirmed,
    #[sea_orm(string_value = "waitlisted")]
    Waitlisted,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl Status {
    /// Whether a booking in this status still holds (or waits for) a seat.
    pub fn is_active(&self) -> bool {
        !matches!(self, Status::Canceled)
    }

    /// Whether moving from `self` to `next` is a legal ledger transition.
    pub fn can_transition_to(&self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Confirmed, Status::Canceled)
                | (Status::Waitlisted, Status::Confirmed)
                | (Status::Waitlisted, Status::Canceled)
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Confirmed => write!(fmt, "confirmed"),
            Status::Waitlisted => write!(fmt, "waitlisted"),
            Status::Canceled => write!(fmt, "canceled"),
        }
    }
}
