use serde::Deserialize;
use utoipa::ToSchema;

use domain::Id;

/// Body of `POST /book-event`. `userId` books on behalf of another user of the
/// same tenant and is limited to organizers and admins.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookEventParams {
    #[schema(value_type = Option<Uuid>)]
    pub(crate) event_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub(crate) user_id: Option<Id>,
}

/// Body of `POST /cancel-booking`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelBookingParams {
    #[schema(value_type = Option<Uuid>)]
    pub(crate) booking_id: Option<Id>,
}
