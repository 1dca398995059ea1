//! Booking admission and cancellation.
//!
//! Every change to an event's ledger runs under that event's lock and inside a
//! transaction that re-reads the event row `FOR UPDATE`. The notification and
//! log for a change are written after its transaction commits.

use crate::admission;
use crate::audit::{self, TransitionKind};
use crate::authorization::{self, Caller};
use crate::error::Error;
use crate::promotion;
use crate::{booking_logs, bookings, events, status::Status, Id};
use entity_api::{booking, booking_log, event, user};
use log::*;
use sea_orm::{DatabaseConnection, TransactionTrait};
use service::locks::KeyedLocks;

pub use entity_api::booking::BookingWithEvent;

/// Books `event_id` for `user_id` (the caller when absent). The booking is
/// confirmed if a seat is free and waitlisted otherwise.
pub async fn create(
    db: &DatabaseConnection,
    locks: &KeyedLocks<Id>,
    caller: &Caller,
    event_id: Option<Id>,
    user_id: Option<Id>,
) -> Result<bookings::Model, Error> {
    let event_id = event_id.ok_or_else(|| Error::invalid("Event ID is required"))?;
    let event = find_event(db, event_id).await?;
    authorization::same_tenant(caller, event.tenant_id)?;

    let user_id = match user_id {
        Some(user_id) if user_id != caller.user_id => {
            authorization::staff(caller)?;
            let target = user::find_by_id(db, user_id)
                .await
                .map_err(|e| Error::from(e).describe_not_found("User not found"))?;
            authorization::book_for(caller, &target)?;
            target.id
        }
        _ => caller.user_id,
    };

    let _guard = locks.lock(event.id).await;
    let txn = db.begin().await?;
    let event = event::find_by_id_for_update(&txn, event.id).await?;

    if booking::find_active_by_event_and_user(&txn, event.id, user_id)
        .await?
        .is_some()
    {
        return Err(Error::conflict(ALREADY_BOOKED));
    }

    let confirmed = booking::count_by_event_and_status(&txn, event.id, Status::Confirmed).await?;
    let status = admission::decide_status(event.capacity, confirmed);

    let created = booking::create(&txn, event.tenant_id, event.id, user_id, status)
        .await
        .map_err(|e| Error::from(e).describe_conflict(ALREADY_BOOKED))?;
    txn.commit().await?;

    info!(
        "Booking {} for event {} is {status} ({confirmed}/{} confirmed before)",
        created.id, event.id, event.capacity
    );
    audit::record(db, TransitionKind::created(status), &created, &event).await;

    Ok(created)
}

/// Cancels a booking and, when it held a confirmed seat, promotes the head of
/// the event's waitlist into that seat.
pub async fn cancel(
    db: &DatabaseConnection,
    locks: &KeyedLocks<Id>,
    caller: &Caller,
    booking_id: Option<Id>,
) -> Result<bookings::Model, Error> {
    let booking_id = booking_id.ok_or_else(|| Error::invalid("Booking ID is required"))?;
    let existing = find_booking(db, booking_id).await?;
    authorization::owner_or_staff(caller, existing.tenant_id, existing.user_id)?;

    let _guard = locks.lock(existing.event_id).await;
    let txn = db.begin().await?;
    let event = event::find_by_id_for_update(&txn, existing.event_id).await?;
    // Re-read under the lock; a concurrent request may have canceled it already.
    let current = booking::find_by_id(&txn, booking_id).await?;

    if !current.status.can_transition_to(Status::Canceled) {
        return Err(Error::invalid_state("Booking is already canceled"));
    }

    let previous = current.status;
    let canceled = booking::update_status(&txn, current, Status::Canceled).await?;
    txn.commit().await?;

    info!("Booking {} for event {} canceled (was {previous})", canceled.id, event.id);
    audit::record(db, TransitionKind::Canceled { previous }, &canceled, &event).await;
    promotion::on_cancellation(db, previous, &canceled).await;

    Ok(canceled)
}

/// The caller's bookings, newest first, each with its event.
pub async fn find_by_caller(
    db: &DatabaseConnection,
    caller: &Caller,
) -> Result<Vec<BookingWithEvent>, Error> {
    let bookings = booking::find_by_user_with_events(db, caller.user_id).await?;

    Ok(bookings
        .into_iter()
        .filter(|b| b.booking.tenant_id == caller.tenant_id)
        .collect())
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    caller: &Caller,
    booking_id: Id,
) -> Result<bookings::Model, Error> {
    let booking = find_booking(db, booking_id).await?;
    authorization::owner_or_staff(caller, booking.tenant_id, booking.user_id)?;
    Ok(booking)
}

/// The audit history of one booking, oldest first.
pub async fn find_logs(
    db: &DatabaseConnection,
    caller: &Caller,
    booking_id: Id,
) -> Result<Vec<booking_logs::Model>, Error> {
    let booking = find_by_id(db, caller, booking_id).await?;
    Ok(booking_log::find_by_booking(db, booking.id).await?)
}

const ALREADY_BOOKED: &str = "You already have a booking for this event";

async fn find_event(db: &DatabaseConnection, id: Id) -> Result<events::Model, Error> {
    event::find_by_id(db, id)
        .await
        .map_err(|e| Error::from(e).describe_not_found("Event not found"))
}

async fn find_booking(db: &DatabaseConnection, id: Id) -> Result<bookings::Model, Error> {
    booking::find_by_id(db, id)
        .await
        .map_err(|e| Error::from(e).describe_not_found("Booking not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking_log_action::BookingLogAction;
    use crate::error::{AccessErrorKind, DomainErrorKind, StateErrorKind};
    use crate::notification_type::NotificationType;
    use crate::roles::Role;
    use crate::test_support::{caller, Fixture};
    use entity_api::notification;
    use sea_orm::ConnectionTrait;
    use std::sync::Arc;
    use std::time::Duration;

    async fn book(fixture: &Fixture, user_index: usize, event_id: Id) -> bookings::Model {
        create(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[user_index]),
            Some(event_id),
            None,
        )
        .await
        .expect("booking")
    }

    async fn audit_actions(fixture: &Fixture, booking_id: Id) -> Vec<BookingLogAction> {
        booking_log::find_by_booking(fixture.db(), booking_id)
            .await
            .expect("logs")
            .into_iter()
            .map(|log| log.action)
            .collect()
    }

    #[tokio::test]
    async fn bookings_beyond_capacity_are_waitlisted() {
        let fixture = Fixture::new().await;
        let event = fixture.event(2).await;

        let first = book(&fixture, 0, event.id).await;
        let second = book(&fixture, 1, event.id).await;
        let third = book(&fixture, 2, event.id).await;

        assert_eq!(first.status, Status::Confirmed);
        assert_eq!(second.status, Status::Confirmed);
        assert_eq!(third.status, Status::Waitlisted);
        assert_eq!(third.tenant_id, fixture.tenant.id);
    }

    #[tokio::test]
    async fn every_admission_writes_one_notification_and_one_log() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;

        let confirmed = book(&fixture, 0, event.id).await;
        let waitlisted = book(&fixture, 1, event.id).await;

        assert_eq!(
            audit_actions(&fixture, confirmed.id).await,
            vec![BookingLogAction::AutoConfirm]
        );
        assert_eq!(
            audit_actions(&fixture, waitlisted.id).await,
            vec![BookingLogAction::AutoWaitlist]
        );

        let notifications = notification::find_by_booking(fixture.db(), waitlisted.id)
            .await
            .unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications[0].notification_type,
            NotificationType::Waitlisted
        );
        assert_eq!(notifications[0].user_id, fixture.attendees[1].id);
        assert_eq!(
            notifications[0].message,
            "You have been added to the waitlist for Web Development Workshop."
        );
    }

    #[tokio::test]
    async fn canceling_a_confirmed_booking_promotes_the_waitlist_head() {
        let fixture = Fixture::new().await;
        let event = fixture.event(2).await;
        let first = book(&fixture, 0, event.id).await;
        book(&fixture, 1, event.id).await;
        let third = book(&fixture, 2, event.id).await;

        let canceled = cancel(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[0]),
            Some(first.id),
        )
        .await
        .unwrap();

        assert_eq!(canceled.status, Status::Canceled);
        let promoted = booking::find_by_id(fixture.db(), third.id).await.unwrap();
        assert_eq!(promoted.status, Status::Confirmed);
        assert_eq!(
            audit_actions(&fixture, third.id).await,
            vec![
                BookingLogAction::AutoWaitlist,
                BookingLogAction::PromoteFromWaitlist
            ]
        );
        assert_eq!(
            audit_actions(&fixture, first.id).await,
            vec![
                BookingLogAction::AutoConfirm,
                BookingLogAction::CancelConfirmed
            ]
        );
    }

    #[tokio::test]
    async fn promotion_follows_waitlist_order() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;
        let first = book(&fixture, 0, event.id).await;
        let second = book(&fixture, 1, event.id).await;
        let third = book(&fixture, 2, event.id).await;

        cancel(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.organizer),
            Some(first.id),
        )
        .await
        .unwrap();

        let second = booking::find_by_id(fixture.db(), second.id).await.unwrap();
        let third = booking::find_by_id(fixture.db(), third.id).await.unwrap();
        assert_eq!(second.status, Status::Confirmed);
        assert_eq!(third.status, Status::Waitlisted);
    }

    #[tokio::test]
    async fn canceling_a_waitlisted_booking_promotes_nobody() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;
        book(&fixture, 0, event.id).await;
        let second = book(&fixture, 1, event.id).await;
        let third = book(&fixture, 2, event.id).await;

        cancel(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[1]),
            Some(second.id),
        )
        .await
        .unwrap();

        let third = booking::find_by_id(fixture.db(), third.id).await.unwrap();
        assert_eq!(third.status, Status::Waitlisted);
        let logs = booking_log::find_by_booking(fixture.db(), second.id)
            .await
            .unwrap();
        assert_eq!(
            logs.last().map(|l| l.note.as_str()),
            Some("Waitlisted booking was canceled.")
        );
    }

    #[tokio::test]
    async fn a_second_active_booking_is_a_conflict() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;
        book(&fixture, 0, event.id).await;

        let result = create(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[0]),
            Some(event.id),
            None,
        )
        .await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::State(StateErrorKind::Conflict(
                "You already have a booking for this event".to_string()
            )))
        );
        let count = booking::count_by_event_and_status(fixture.db(), event.id, Status::Confirmed)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn a_canceled_booking_does_not_block_booking_again() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;
        let first = book(&fixture, 0, event.id).await;
        cancel(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[0]),
            Some(first.id),
        )
        .await
        .unwrap();

        let again = book(&fixture, 0, event.id).await;

        assert_ne!(again.id, first.id);
        assert_eq!(again.status, Status::Confirmed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_never_overfill_an_event() {
        let fixture = Arc::new(Fixture::pooled(10).await);
        let event_id = fixture.event(1).await.id;

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let fixture = Arc::clone(&fixture);
                tokio::spawn(async move { book(&fixture, i, event_id).await })
            })
            .collect();

        let mut statuses = Vec::new();
        for task in tasks {
            statuses.push(task.await.unwrap().status);
        }

        assert_eq!(
            statuses.iter().filter(|s| **s == Status::Confirmed).count(),
            1
        );
        assert_eq!(
            statuses.iter().filter(|s| **s == Status::Waitlisted).count(),
            9
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_requests_admit_one_booking() {
        let fixture = Arc::new(Fixture::pooled(3).await);
        let event_id = fixture.event(5).await.id;
        let attendee = caller(&fixture.attendees[0]);

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let fixture = Arc::clone(&fixture);
                tokio::spawn(async move {
                    create(fixture.db(), &fixture.locks, &attendee, Some(event_id), None)
                        .await
                        .map(|booking| booking.id)
                })
            })
            .collect();

        let mut admitted = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn booking_waits_for_the_event_lock() {
        let fixture = Arc::new(Fixture::new().await);
        let event_id = fixture.event(1).await.id;

        let guard = fixture.locks.lock(event_id).await;
        let task = {
            let fixture = Arc::clone(&fixture);
            tokio::spawn(async move { book(&fixture, 0, event_id).await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!task.is_finished());
        let confirmed =
            booking::count_by_event_and_status(fixture.db(), event_id, Status::Confirmed)
                .await
                .unwrap();
        assert_eq!(confirmed, 0);

        drop(guard);
        let booked = task.await.unwrap();
        assert_eq!(booked.status, Status::Confirmed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancellation_waits_for_the_event_lock() {
        let fixture = Arc::new(Fixture::new().await);
        let event_id = fixture.event(1).await.id;
        let booking_id = book(&fixture, 0, event_id).await.id;

        let guard = fixture.locks.lock(event_id).await;
        let task = {
            let fixture = Arc::clone(&fixture);
            let attendee = caller(&fixture.attendees[0]);
            tokio::spawn(async move {
                cancel(fixture.db(), &fixture.locks, &attendee, Some(booking_id)).await
            })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!task.is_finished());
        let current = booking::find_by_id(fixture.db(), booking_id).await.unwrap();
        assert_eq!(current.status, Status::Confirmed);

        drop(guard);
        let canceled = task.await.unwrap().unwrap();
        assert_eq!(canceled.status, Status::Canceled);
    }

    #[tokio::test]
    async fn audit_failures_do_not_undo_bookings_or_promotions() {
        let fixture = Fixture::new().await;
        let event = fixture.event(1).await;
        fixture
            .db()
            .execute_unprepared("DROP TABLE notifications")
            .await
            .unwrap();

        let first = book(&fixture, 0, event.id).await;
        let second = book(&fixture, 1, event.id).await;
        let canceled = cancel(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[0]),
            Some(first.id),
        )
        .await
        .unwrap();

        assert_eq!(first.status, Status::Confirmed);
        assert_eq!(second.status, Status::Waitlisted);
        assert_eq!(canceled.status, Status::Canceled);
        let promoted = booking::find_by_id(fixture.db(), second.id).await.unwrap();
        assert_eq!(promoted.status, Status::Confirmed);
        // Each audit write rolled back as a whole; no log lost its notification.
        assert!(audit_actions(&fixture, first.id).await.is_empty());
        assert!(audit_actions(&fixture, second.id).await.is_empty());
    }

    #[tokio::test]
    async fn canceling_twice_is_rejected_without_new_audit_entries() {
        let fixture = Fixture::new().await;
        let event = fixture.event(2).await;
        let booking = book(&fixture, 0, event.id).await;
        let attendee = caller(&fixture.attendees[0]);

        cancel(fixture.db(), &fixture.locks, &attendee, Some(booking.id))
            .await
            .unwrap();
        let logs_before = audit_actions(&fixture, booking.id).await.len();

        let result = cancel(fixture.db(), &fixture.locks, &attendee, Some(booking.id)).await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::State(StateErrorKind::InvalidState(
                "Booking is already canceled".to_string()
            )))
        );
        assert_eq!(audit_actions(&fixture, booking.id).await.len(), logs_before);
        let notifications = notification::find_by_booking(fixture.db(), booking.id)
            .await
            .unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn missing_ids_are_invalid() {
        let fixture = Fixture::new().await;
        let attendee = caller(&fixture.attendees[0]);

        let booked = create(fixture.db(), &fixture.locks, &attendee, None, None).await;
        let canceled = cancel(fixture.db(), &fixture.locks, &attendee, None).await;

        assert_eq!(
            booked.map_err(|e| e.error_kind),
            Err(DomainErrorKind::Invalid("Event ID is required".to_string()))
        );
        assert_eq!(
            canceled.map_err(|e| e.error_kind),
            Err(DomainErrorKind::Invalid("Booking ID is required".to_string()))
        );
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let fixture = Fixture::new().await;

        let result = create(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[0]),
            Some(Id::new_v4()),
            None,
        )
        .await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::NotFound("Event not found".to_string()))
        );
    }

    #[tokio::test]
    async fn events_of_other_tenants_are_forbidden() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;
        let outsider = fixture.outsider(Role::Attendee).await;

        let result = create(
            fixture.db(),
            &fixture.locks,
            &caller(&outsider),
            Some(event.id),
            None,
        )
        .await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::Access(AccessErrorKind::Forbidden))
        );
    }

    #[tokio::test]
    async fn staff_may_book_on_behalf_of_a_tenant_user() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;

        let booking = create(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.organizer),
            Some(event.id),
            Some(fixture.attendees[2].id),
        )
        .await
        .unwrap();

        assert_eq!(booking.user_id, fixture.attendees[2].id);
        let notifications = notification::find_by_booking(fixture.db(), booking.id)
            .await
            .unwrap();
        assert_eq!(notifications[0].user_id, fixture.attendees[2].id);
    }

    #[tokio::test]
    async fn attendees_may_not_book_for_someone_else() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;

        let result = create(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[0]),
            Some(event.id),
            Some(fixture.attendees[1].id),
        )
        .await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::Access(AccessErrorKind::Forbidden))
        );
    }

    #[tokio::test]
    async fn staff_may_not_book_for_users_of_other_tenants() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;
        let outsider = fixture.outsider(Role::Attendee).await;

        let result = create(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.admin),
            Some(event.id),
            Some(outsider.id),
        )
        .await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::Access(AccessErrorKind::Forbidden))
        );
    }

    #[tokio::test]
    async fn attendees_may_not_cancel_someone_elses_booking() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;
        let booking = book(&fixture, 0, event.id).await;

        let result = cancel(
            fixture.db(),
            &fixture.locks,
            &caller(&fixture.attendees[1]),
            Some(booking.id),
        )
        .await;

        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(DomainErrorKind::Access(AccessErrorKind::Forbidden))
        );
        let unchanged = booking::find_by_id(fixture.db(), booking.id).await.unwrap();
        assert_eq!(unchanged.status, Status::Confirmed);
    }

    #[tokio::test]
    async fn find_by_caller_returns_own_bookings_with_events() {
        let fixture = Fixture::new().await;
        let workshop = fixture.event(5).await;
        let later = fixture.event_on(5, 14).await;
        book(&fixture, 0, workshop.id).await;
        book(&fixture, 0, later.id).await;
        book(&fixture, 1, workshop.id).await;

        let bookings = find_by_caller(fixture.db(), &caller(&fixture.attendees[0]))
            .await
            .unwrap();

        assert_eq!(bookings.len(), 2);
        assert!(bookings
            .iter()
            .all(|b| b.booking.user_id == fixture.attendees[0].id));
        assert!(bookings.iter().all(|b| b.event.is_some()));
    }

    #[tokio::test]
    async fn booking_logs_are_visible_to_owner_and_staff_only() {
        let fixture = Fixture::new().await;
        let event = fixture.event(5).await;
        let booking = book(&fixture, 0, event.id).await;

        let own = find_logs(fixture.db(), &caller(&fixture.attendees[0]), booking.id)
            .await
            .unwrap();
        let staff = find_logs(fixture.db(), &caller(&fixture.organizer), booking.id)
            .await
            .unwrap();
        let other = find_logs(fixture.db(), &caller(&fixture.attendees[1]), booking.id).await;

        assert_eq!(own.len(), 1);
        assert_eq!(staff, own);
        assert!(other.is_err());
    }
}
