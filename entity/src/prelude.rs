pub use super::booking_logs::Entity as BookingLogs;
pub use super::bookings::Entity as Bookings;
pub use super::events::Entity as Events;
pub use super::notifications::Entity as Notifications;
pub use super::tenants::Entity as Tenants;
pub use super::users::Entity as Users;
