//! Read-only tenant rollups for organizers and admins.

use crate::authorization::{self, Caller};
use crate::error::Error;
use crate::{booking_logs, status::Status, Id};
use chrono::{DateTime, Utc};
use entity_api::{booking, booking_log, event};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

/// An upcoming event with its booking counts.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub title: String,
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<chrono::FixedOffset>,
    pub capacity: i32,
    pub confirmed_count: u64,
    pub waitlisted_count: u64,
    pub canceled_count: u64,
    /// Confirmed bookings as a percentage of capacity.
    pub percentage_filled: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAnalytics {
    pub total_events: u64,
    pub total_confirmed_bookings: u64,
    pub total_waitlisted_bookings: u64,
    pub total_canceled_bookings: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub upcoming_events: Vec<EventSummary>,
    pub summary_analytics: SummaryAnalytics,
    pub recent_activity: Vec<booking_logs::Model>,
}

pub fn percentage_filled(confirmed: u64, capacity: i32) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    confirmed as f64 / f64::from(capacity) * 100.0
}

/// Builds the dashboard for the caller's tenant as of `now`, including the
/// `recent_activity_limit` newest booking log entries.
pub async fn summary(
    db: &DatabaseConnection,
    caller: &Caller,
    now: DateTime<Utc>,
    recent_activity_limit: u64,
) -> Result<Dashboard, Error> {
    authorization::staff(caller)?;
    let tenant_id = caller.tenant_id;

    let mut upcoming_events = Vec::new();
    for event in event::find_upcoming_by_tenant(db, tenant_id, now.into()).await? {
        let confirmed_count =
            booking::count_by_event_and_status(db, event.id, Status::Confirmed).await?;
        let waitlisted_count =
            booking::count_by_event_and_status(db, event.id, Status::Waitlisted).await?;
        let canceled_count =
            booking::count_by_event_and_status(db, event.id, Status::Canceled).await?;

        upcoming_events.push(EventSummary {
            id: event.id,
            title: event.title,
            date: event.date,
            capacity: event.capacity,
            confirmed_count,
            waitlisted_count,
            canceled_count,
            percentage_filled: percentage_filled(confirmed_count, event.capacity),
        });
    }

    let summary_analytics = SummaryAnalytics {
        total_events: event::count_by_tenant(db, tenant_id).await?,
        total_confirmed_bookings: booking::count_by_tenant_and_status(
            db,
            tenant_id,
            Status::Confirmed,
        )
        .await?,
        total_waitlisted_bookings: booking::count_by_tenant_and_status(
            db,
            tenant_id,
            Status::Waitlisted,
        )
        .await?,
        total_canceled_bookings: booking::count_by_tenant_and_status(
            db,
            tenant_id,
            Status::Canceled,
        )
        .await?,
    };

    let recent_activity =
        booking_log::find_recent_by_tenant(db, tenant_id, recent_activity_limit).await?;

    Ok(Dashboard {
        upcoming_events,
        summary_analytics,
        recent_activity,
    })
}
