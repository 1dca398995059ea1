use crate::status::Status;

/// Decides the status of a new booking from the event's capacity and the
/// number of bookings already confirmed for it.
///
/// The count must be read while holding the event's lock, otherwise two
/// requests can both observe a free slot.
pub fn decide_status(event_capacity: i32, current_confirmed_count: u64) -> Status {
    let capacity = u64::try_from(event_capacity).unwrap_or(0);
    if current_confirmed_count < capacity {
        Status::Confirmed
    } else {
        Status::Waitlisted
    }
}

/// Whether an event with `event_capacity` seats has room for one more confirmation.
pub fn has_open_slot(event_capacity: i32, current_confirmed_count: u64) -> bool {
    decide_status(event_capacity, current_confirmed_count) == Status::Confirmed
}
