//! Tenant and role checks applied before any booking logic runs.
//!
//! Every check is a pure function of the caller and the record's tenant/owner
//! so it can be tested without a database.

use crate::error::Error;
use crate::{events, roles::Role, users, Id};

/// The authenticated identity a request acts as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Id,
    pub tenant_id: Id,
    pub role: Role,
}

impl Caller {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

impl From<&users::Model> for Caller {
    fn from(user: &users::Model) -> Self {
        Caller {
            user_id: user.id,
            tenant_id: user.tenant_id,
            role: user.role,
        }
    }
}

pub fn same_tenant(caller: &Caller, tenant_id: Id) -> Result<(), Error> {
    if caller.tenant_id == tenant_id {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}

pub fn staff(caller: &Caller) -> Result<(), Error> {
    if caller.is_staff() {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}

/// The record's owner, or any organizer/admin of the record's tenant.
pub fn owner_or_staff(caller: &Caller, tenant_id: Id, owner_id: Id) -> Result<(), Error> {
    same_tenant(caller, tenant_id)?;
    if caller.user_id == owner_id || caller.is_staff() {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}

/// Only the record's owner, and only inside their own tenant.
pub fn owner(caller: &Caller, tenant_id: Id, owner_id: Id) -> Result<(), Error> {
    same_tenant(caller, tenant_id)?;
    if caller.user_id == owner_id {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}

/// Admins manage every event of their tenant; organizers only the ones they organize.
pub fn event_manager(caller: &Caller, event: &events::Model) -> Result<(), Error> {
    same_tenant(caller, event.tenant_id)?;
    match caller.role {
        Role::Admin => Ok(()),
        Role::Organizer if event.organizer_id == caller.user_id => Ok(()),
        _ => Err(Error::forbidden()),
    }
}

/// Attendees book only for themselves; staff may book for anyone in their tenant.
pub fn book_for(caller: &Caller, target: &users::Model) -> Result<(), Error> {
    same_tenant(caller, target.tenant_id)?;
    if caller.user_id == target.id || caller.is_staff() {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}
