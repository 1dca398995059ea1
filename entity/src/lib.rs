use uuid::Uuid;

pub mod prelude;

// Core entities
pub mod booking_logs;
pub mod bookings;
pub mod events;
pub mod notifications;
pub mod tenants;
pub mod users;

// Enumerated column types
pub mod booking_log_action;
pub mod notification_type;
pub mod roles;
pub mod status;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
