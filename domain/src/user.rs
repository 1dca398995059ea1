use crate::authorization::{self, Caller};
use crate::error::Error;
use crate::users;
use entity_api::user;
use sea_orm::DatabaseConnection;

pub use entity_api::user::{find_by_email, find_by_id, AuthSession, Backend, Credentials};

/// Users of the caller's tenant, ordered by email; organizers and admins only.
pub async fn find_by_tenant(
    db: &DatabaseConnection,
    caller: &Caller,
) -> Result<Vec<users::Model>, Error> {
    authorization::staff(caller)?;
    Ok(user::find_by_tenant(db, caller.tenant_id).await?)
}
