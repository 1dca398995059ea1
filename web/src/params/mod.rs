//! Typed parameters for endpoint inputs.
//!
//! Request bodies and query strings are decoded into these types before any
//! domain logic runs, so a malformed id never reaches the booking ledger.

pub(crate) mod booking;
pub(crate) mod event;
