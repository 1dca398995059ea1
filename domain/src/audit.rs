//! Notification and booking log written for every booking status transition.

use crate::error::Error;
use crate::{
    booking_log_action::BookingLogAction, bookings, events, notification_type::NotificationType,
    status::Status,
};
use entity_api::{booking_log, notification};
use log::*;
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Why a waitlisted booking was moved to confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromotionCause {
    Cancellation,
    CapacityIncrease,
}

/// A booking status transition that must be recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    CreatedConfirmed,
    CreatedWaitlisted,
    Canceled { previous: Status },
    Promoted { cause: PromotionCause },
}

impl TransitionKind {
    /// The transition produced by admitting a new booking with `status`.
    /// Admission only ever confirms or waitlists.
    pub fn created(status: Status) -> Self {
        debug_assert_ne!(status, Status::Canceled, "a new booking cannot be canceled");
        match status {
            Status::Waitlisted => TransitionKind::CreatedWaitlisted,
            Status::Confirmed | Status::Canceled => TransitionKind::CreatedConfirmed,
        }
    }
}

/// The notification and log content for one transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEntry {
    pub notification_type: NotificationType,
    pub title: &'static str,
    pub message: String,
    pub action: BookingLogAction,
    pub note: &'static str,
}

pub fn entry_for(kind: TransitionKind, event_title: &str) -> AuditEntry {
    match kind {
        TransitionKind::CreatedConfirmed => AuditEntry {
            notification_type: NotificationType::BookingConfirmed,
            title: "Booking Confirmed",
            message: format!("Your booking for {event_title} has been confirmed."),
            action: BookingLogAction::AutoConfirm,
            note: "Booking was automatically confirmed due to available capacity.",
        },
        TransitionKind::CreatedWaitlisted => AuditEntry {
            notification_type: NotificationType::Waitlisted,
            title: "Added to Waitlist",
            message: format!("You have been added to the waitlist for {event_title}."),
            action: BookingLogAction::AutoWaitlist,
            note: "Booking was automatically waitlisted due to event being at capacity.",
        },
        TransitionKind::Canceled { previous } => AuditEntry {
            notification_type: NotificationType::BookingCanceled,
            title: "Booking Canceled",
            message: format!("Your booking for {event_title} has been canceled."),
            action: BookingLogAction::CancelConfirmed,
            note: match previous {
                Status::Waitlisted => "Waitlisted booking was canceled.",
                _ => "Confirmed booking was canceled.",
            },
        },
        TransitionKind::Promoted { cause } => AuditEntry {
            notification_type: NotificationType::WaitlistPromoted,
            title: "Promoted from Waitlist",
            message: format!(
                "Great news! You've been promoted from the waitlist for {event_title}."
            ),
            action: BookingLogAction::PromoteFromWaitlist,
            note: match cause {
                PromotionCause::Cancellation => {
                    "Booking was promoted from waitlist due to a cancellation."
                }
                PromotionCause::CapacityIncrease => {
                    "Booking was promoted from waitlist due to a capacity increase."
                }
            },
        },
    }
}

/// Writes the notification and booking log for a transition that has already
/// been committed. Both rows are written together or not at all; a failure is
/// logged and never reaches the caller.
pub async fn record(
    db: &DatabaseConnection,
    kind: TransitionKind,
    booking: &bookings::Model,
    event: &events::Model,
) {
    if let Err(err) = write(db, kind, booking, event).await {
        error!(
            "Failed to record {kind:?} audit entry for booking {}: {err}",
            booking.id
        );
    }
}

async fn write(
    db: &DatabaseConnection,
    kind: TransitionKind,
    booking: &bookings::Model,
    event: &events::Model,
) -> Result<(), Error> {
    let entry = entry_for(kind, &event.title);
    let txn = db.begin().await?;

    notification::create(
        &txn,
        booking.tenant_id,
        booking.user_id,
        booking.id,
        entry.notification_type,
        entry.title,
        entry.message,
    )
    .await?;

    booking_log::create(
        &txn,
        booking.tenant_id,
        booking.id,
        booking.event_id,
        booking.user_id,
        entry.action,
        entry.note,
    )
    .await?;

    txn.commit().await?;

    debug!("Recorded {} for booking {}", entry.action, booking.id);
    Ok(())
}
