//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use sea_orm::DbErr;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api`, and `web` is dependent on `domain`.
/// but `web` should not be dependent, directly, on `entity_api`. Each layer is free to define its own
/// error kinds to whatever richeness needed at that layer. Ultimately the various `error_kind`s are used
/// by `web` to return appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    Access(AccessErrorKind),
    State(StateErrorKind),
    /// A referenced record does not exist. Carries a message naming the record.
    NotFound(String),
    /// The request itself is malformed. Carries a message for the client.
    Invalid(String),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    Invalid,
    DbTransaction,
    Other(String),
}

/// Who may do what: the caller is unknown, or known but not allowed.
#[derive(Debug, PartialEq)]
pub enum AccessErrorKind {
    Unauthenticated,
    Forbidden,
}

/// The request is well formed but the current state of the ledger rejects it.
#[derive(Debug, PartialEq)]
pub enum StateErrorKind {
    /// A second active booking, or another uniqueness clash.
    Conflict(String),
    /// The record is not in a state that allows the transition.
    InvalidState(String),
}

impl Error {
    pub(crate) fn new(error_kind: DomainErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub fn forbidden() -> Self {
        Self::new(DomainErrorKind::Access(AccessErrorKind::Forbidden))
    }

    pub fn unauthenticated() -> Self {
        Self::new(DomainErrorKind::Access(AccessErrorKind::Unauthenticated))
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(DomainErrorKind::NotFound(message.to_string()))
    }

    pub fn invalid(message: &str) -> Self {
        Self::new(DomainErrorKind::Invalid(message.to_string()))
    }

    pub fn conflict(message: &str) -> Self {
        Self::new(DomainErrorKind::State(StateErrorKind::Conflict(
            message.to_string(),
        )))
    }

    pub fn invalid_state(message: &str) -> Self {
        Self::new(DomainErrorKind::State(StateErrorKind::InvalidState(
            message.to_string(),
        )))
    }

    /// Names the missing record when this is a not-found error; other errors pass through.
    pub fn describe_not_found(mut self, message: &str) -> Self {
        if let DomainErrorKind::NotFound(_) = self.error_kind {
            self.error_kind = DomainErrorKind::NotFound(message.to_string());
        }
        self
    }

    /// Names the clash when this is a conflict error; other errors pass through.
    pub fn describe_conflict(mut self, message: &str) -> Self {
        if let DomainErrorKind::State(StateErrorKind::Conflict(_)) = self.error_kind {
            self.error_kind =
                DomainErrorKind::State(StateErrorKind::Conflict(message.to_string()));
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api`` layer to the `domain`` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => {
                DomainErrorKind::NotFound("Record not found".to_string())
            }
            EntityApiErrorKind::RecordAlreadyExists => DomainErrorKind::State(
                StateErrorKind::Conflict("Record already exists".to_string()),
            ),
            EntityApiErrorKind::RecordUnauthenticated => {
                DomainErrorKind::Access(AccessErrorKind::Unauthenticated)
            }
            EntityApiErrorKind::InvalidQueryTerm | EntityApiErrorKind::ValidationError => {
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
            }
            EntityApiErrorKind::SystemError | EntityApiErrorKind::RecordNotUpdated => {
                DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::DbTransaction,
                ))
            }
            EntityApiErrorKind::Other => DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Other("EntityErrorKind".to_string()),
            )),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

// Transaction begin/commit talk to SeaORM directly.
impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        EntityApiError::from(err).into()
    }
}
