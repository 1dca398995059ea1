pub(crate) mod booking_controller;
pub(crate) mod dashboard_controller;
pub(crate) mod event_controller;
pub(crate) mod health_check_controller;
pub(crate) mod notification_controller;
pub(crate) mod user_controller;
pub(crate) mod user_session_controller;
