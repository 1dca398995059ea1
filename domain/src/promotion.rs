//! Moves waitlisted bookings into confirmed seats as seats open up.
//!
//! Callers must hold the event's lock from `service::locks::KeyedLocks` for
//! the duration of a promotion run.

use crate::admission;
use crate::audit::{self, PromotionCause, TransitionKind};
use crate::error::Error;
use crate::{bookings, status::Status, Id};
use entity_api::{booking, event};
use log::*;
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Promotes the head of the waitlist after `canceled` left the confirmed set.
///
/// Does nothing unless the booking was confirmed before it was canceled. The
/// cancellation is already committed, so a failure here is logged and the
/// booking is simply left on the waitlist.
pub async fn on_cancellation(
    db: &DatabaseConnection,
    previous_status: Status,
    canceled: &bookings::Model,
) -> Option<bookings::Model> {
    if previous_status != Status::Confirmed {
        return None;
    }

    match promote_next(db, canceled.event_id, PromotionCause::Cancellation).await {
        Ok(promoted) => promoted,
        Err(err) => {
            warn!(
                "Waitlist promotion after canceling booking {} failed: {err}",
                canceled.id
            );
            None
        }
    }
}

/// Promotes waitlisted bookings, oldest first, until the event is full or the
/// waitlist is empty. Returns the promoted bookings in promotion order.
pub async fn fill_open_slots(
    db: &DatabaseConnection,
    event_id: Id,
) -> Result<Vec<bookings::Model>, Error> {
    let mut promoted = Vec::new();
    while let Some(booking) = promote_next(db, event_id, PromotionCause::CapacityIncrease).await? {
        promoted.push(booking);
    }

    if !promoted.is_empty() {
        info!(
            "Promoted {} waitlisted booking(s) for event {event_id}",
            promoted.len()
        );
    }
    Ok(promoted)
}

async fn promote_next(
    db: &DatabaseConnection,
    event_id: Id,
    cause: PromotionCause,
) -> Result<Option<bookings::Model>, Error> {
    let txn = db.begin().await?;
    let event = event::find_by_id_for_update(&txn, event_id).await?;

    let confirmed = booking::count_by_event_and_status(&txn, event.id, Status::Confirmed).await?;
    if !admission::has_open_slot(event.capacity, confirmed) {
        return Ok(None);
    }

    let Some(head) = booking::find_oldest_waitlisted(&txn, event.id).await? else {
        return Ok(None);
    };

    let promoted = booking::update_status(&txn, head, Status::Confirmed).await?;
    txn.commit().await?;

    info!(
        "Promoted booking {} from the waitlist of event {}",
        promoted.id, event.id
    );
    audit::record(db, TransitionKind::Promoted { cause }, &promoted, &event).await;

    Ok(Some(promoted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    async fn add(
        fixture: &Fixture,
        event_id: Id,
        user_index: usize,
        status: Status,
    ) -> bookings::Model {
        booking::create(
            fixture.db(),
            fixture.tenant.id,
            event_id,
            fixture.attendees[user_index].id,
            status,
        )
        .await
        .expect("booking")
    }

    #[tokio::test]
    async fn on_cancellation_ignores_waitlisted_cancellations() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;
        add(&fixture, event.id, 0, Status::Confirmed).await;
        let canceled = add(&fixture, event.id, 1, Status::Canceled).await;
        add(&fixture, event.id, 2, Status::Waitlisted).await;

        let promoted = on_cancellation(fixture.db(), Status::Waitlisted, &canceled).await;

        assert_eq!(promoted, None);
    }

    #[tokio::test]
    async fn on_cancellation_promotes_only_when_a_seat_is_free() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;
        // Still full: the canceled booking's seat has been taken back already.
        add(&fixture, event.id, 0, Status::Confirmed).await;
        let canceled = add(&fixture, event.id, 1, Status::Canceled).await;
        let waiting = add(&fixture, event.id, 2, Status::Waitlisted).await;

        let promoted = on_cancellation(fixture.db(), Status::Confirmed, &canceled).await;

        assert_eq!(promoted, None);
        let waiting = booking::find_by_id(fixture.db(), waiting.id).await.unwrap();
        assert_eq!(waiting.status, Status::Waitlisted);
    }

    #[tokio::test]
    async fn on_cancellation_with_an_empty_waitlist_is_a_no_op() {
        let fixture = Fixture::new().await;
        let event = fixture.event(2).await;
        let canceled = add(&fixture, event.id, 0, Status::Canceled).await;

        assert_eq!(
            on_cancellation(fixture.db(), Status::Confirmed, &canceled).await,
            None
        );
    }

    #[tokio::test]
    async fn fill_open_slots_promotes_in_waitlist_order_until_full() {
        let fixture = Fixture::with_attendees(4).await;
        let event = fixture.event(3).await;
        add(&fixture, event.id, 0, Status::Confirmed).await;
        let first = add(&fixture, event.id, 1, Status::Waitlisted).await;
        let second = add(&fixture, event.id, 2, Status::Waitlisted).await;
        let third = add(&fixture, event.id, 3, Status::Waitlisted).await;

        let promoted = fill_open_slots(fixture.db(), event.id).await.unwrap();

        assert_eq!(
            promoted.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        let third = booking::find_by_id(fixture.db(), third.id).await.unwrap();
        assert_eq!(third.status, Status::Waitlisted);
        let logs = entity_api::booking_log::find_by_booking(fixture.db(), first.id)
            .await
            .unwrap();
        assert_eq!(
            logs.last().map(|l| l.note.as_str()),
            Some("Booking was promoted from waitlist due to a capacity increase.")
        );
    }

    #[tokio::test]
    async fn fill_open_slots_on_a_full_event_promotes_nobody() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;
        add(&fixture, event.id, 0, Status::Confirmed).await;
        add(&fixture, event.id, 1, Status::Waitlisted).await;

        assert!(fill_open_slots(fixture.db(), event.id).await.unwrap().is_empty());
    }
}
